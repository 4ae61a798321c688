//! Domain layer: pure types and decision logic, no I/O.

pub mod colleges;
pub mod conversation;
pub mod education;
pub mod fields;
pub mod foundation;
pub mod gate;
pub mod pathway;
