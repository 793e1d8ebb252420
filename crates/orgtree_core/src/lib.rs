//! Core data layer for the organization tree.
//! This crate is the single source of truth for forest invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::organization::{
    OrgUnitId, OrganizationNode, OrganizationRecord, RemoveReceipt, RenameReceipt, COMPANY_UNIT,
    NO_PARENT, UNSPECIFIED_UNIT,
};
pub use repo::org_repo::{
    HttpOrganizationRepository, OrganizationRepository, RemoteError, RemoteResult,
};
pub use service::forest::{ForestError, ForestResult, OrganizationForest, PreOrder};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
