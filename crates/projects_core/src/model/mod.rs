//! Domain model for tracked projects.
//!
//! # Responsibility
//! - Define the canonical records mapped to and from storage rows.
//! - Keep amounts in an exact fixed-point representation.
//!
//! # Invariants
//! - Identities are assigned by storage, never generated in memory.

pub mod decimal;
pub mod project;
