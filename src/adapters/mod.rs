//! Adapter implementations of the outbound ports.

pub mod gateway;
pub mod store;
