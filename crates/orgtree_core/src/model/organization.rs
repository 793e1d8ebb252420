//! Organization unit model.
//!
//! # Responsibility
//! - Define the flat wire record exchanged with the remote store.
//! - Define the linked node type owned by the forest.
//!
//! # Invariants
//! - `id` is stable and never reused for another unit.
//! - A node lives in exactly one parent's child sequence, or in the
//!   forest's root set when `parent_id` is `NO_PARENT`.
//! - Structural mutation goes through the forest; node mutators are
//!   crate-private.

use serde::{Deserialize, Serialize};

/// Stable identifier for an organization unit.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type OrgUnitId = i64;

/// Sentinel parent id marking a root-level unit.
pub const NO_PARENT: OrgUnitId = -1;

/// Well-known id of the top-level company unit.
pub const COMPANY_UNIT: OrgUnitId = 0;

/// Well-known id of the top-level unassigned bucket.
///
/// Both well-known units are plain roots to the core; callers are
/// expected to treat them as fixed structure.
pub const UNSPECIFIED_UNIT: OrgUnitId = 1;

/// Flat wire record for one organization unit.
///
/// Field names follow the remote store's JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    pub id: OrgUnitId,
    pub name: String,
    pub parent_id: OrgUnitId,
    /// Depth reported by the store. Informational; never re-derived locally.
    pub depth: i64,
}

impl OrganizationRecord {
    /// Returns whether this record describes a root-level unit.
    pub fn is_root(&self) -> bool {
        self.parent_id == NO_PARENT
    }
}

/// Rename response payload. The returned name is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameReceipt {
    pub id: OrgUnitId,
    pub name: String,
}

/// Delete response payload echoing the removed unit id.
///
/// The echoed id is used to re-derive the unit's parent for local
/// detachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveReceipt {
    pub id: OrgUnitId,
}

/// One organization unit linked into the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationNode {
    id: OrgUnitId,
    name: String,
    parent_id: OrgUnitId,
    depth: i64,
    children: Vec<OrganizationNode>,
}

impl OrganizationNode {
    /// Creates an unlinked node from one wire record.
    pub fn from_record(record: OrganizationRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            parent_id: record.parent_id,
            depth: record.depth,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> OrgUnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> OrgUnitId {
        self.parent_id
    }

    pub fn depth(&self) -> i64 {
        self.depth
    }

    /// Returns the ordered direct children.
    pub fn children(&self) -> &[OrganizationNode] {
        &self.children
    }

    /// Returns whether this unit has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns whether this unit is root-level.
    pub fn is_root(&self) -> bool {
        self.parent_id == NO_PARENT
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<OrganizationNode> {
        &mut self.children
    }

    /// Appends `child` to the end of the child sequence.
    ///
    /// No parent-id validation happens here; the forest is responsible
    /// for attaching nodes at the right place.
    pub(crate) fn append_child(&mut self, child: OrganizationNode) {
        self.children.push(child);
    }

    /// Detaches the child with `id`, returning it with its subtree.
    ///
    /// Absent ids are a no-op returning `None`; duplicate detach
    /// requests are tolerated.
    pub(crate) fn remove_child(&mut self, id: OrgUnitId) -> Option<OrganizationNode> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
