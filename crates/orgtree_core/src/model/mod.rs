//! Domain model for organization units.
//!
//! # Responsibility
//! - Define the canonical wire and node structures used by core logic.
//! - Keep one id-addressed shape shared by composition and mutation paths.
//!
//! # Invariants
//! - Every unit is identified by a stable `OrgUnitId`.
//! - Hierarchy membership is expressed through owned child sequences, not
//!   a global registry.

pub mod organization;
