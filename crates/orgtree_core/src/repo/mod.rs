//! Repository layer abstractions and remote implementations.
//!
//! # Responsibility
//! - Define the data access contract against the remote organization store.
//! - Isolate HTTP and wire details from forest orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport and status failures instead of
//!   masking them; no retry happens at this layer.

pub mod org_repo;
