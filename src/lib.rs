//! ElevatePath - Conversational Academic Pathway Advisor
//!
//! This crate implements the slot-filling and pathway-generation core:
//! it extracts structured facts from open-ended chat, decides when enough
//! is known to plan, and generates a multi-phase educational pathway.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
