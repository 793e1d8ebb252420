//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate remote repository calls into forest-level operations.
//! - Keep callers decoupled from wire and transport details.

pub mod forest;
