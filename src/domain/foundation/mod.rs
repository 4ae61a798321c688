//! Foundation value objects shared across the domain.

mod ids;
mod timestamp;

pub use ids::PathwayId;
pub use timestamp::Timestamp;
