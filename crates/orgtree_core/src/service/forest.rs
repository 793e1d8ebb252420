//! Organization forest composition, traversal and confirmed mutations.
//!
//! # Responsibility
//! - Compose the flat record list into linked root trees.
//! - Serve id lookups and pre-order traversal from memory.
//! - Apply local structural changes only after remote confirmation.
//!
//! # Invariants
//! - Every non-root node's `parent_id` equals its owning node's id.
//! - Root order and sibling order follow input record order.
//! - A failed remote call leaves the forest exactly as it was before.

use crate::model::organization::{OrgUnitId, OrganizationNode, OrganizationRecord};
use crate::repo::org_repo::{OrganizationRepository, RemoteError};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by forest operations.
pub type ForestResult<T> = Result<T, ForestError>;

/// Errors from forest composition and mutation operations.
#[derive(Debug)]
pub enum ForestError {
    /// A record references a parent id absent from the record set.
    /// Fatal to `load`; no usable forest exists afterwards.
    MissingParent {
        id: OrgUnitId,
        parent_id: OrgUnitId,
    },
    /// The addressed unit is not present in the forest.
    NotFound(OrgUnitId),
    /// Root-level units cannot be removed.
    RootNotRemovable(OrgUnitId),
    /// The requested name is blank after trimming.
    BlankName,
    /// Remote request failure; no local mutation was applied.
    Remote(RemoteError),
}

impl Display for ForestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParent { id, parent_id } => write!(
                f,
                "record {id} references parent {parent_id} which is not in the record set"
            ),
            Self::NotFound(id) => write!(f, "organization unit not found: {id}"),
            Self::RootNotRemovable(id) => {
                write!(f, "root-level organization unit cannot be removed: {id}")
            }
            Self::BlankName => write!(f, "organization unit name must not be blank"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ForestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RemoteError> for ForestError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// In-memory forest of organization units bound to one remote store.
///
/// The forest value exists only after a successful [`load`], so every
/// read and mutation operates on fully composed state. Mutations take
/// `&mut self`; two mutations can therefore never be in flight against
/// the same forest, and sequential mutations are last-write-wins with
/// the remote response authoritative.
///
/// [`load`]: OrganizationForest::load
#[derive(Debug)]
pub struct OrganizationForest<R: OrganizationRepository> {
    repo: R,
    roots: Vec<OrganizationNode>,
}

impl<R: OrganizationRepository> OrganizationForest<R> {
    /// Fetches the flat record list once and composes the forest.
    ///
    /// This is the explicit initialization step; no other operation is
    /// reachable before it completes.
    ///
    /// # Errors
    /// - `ForestError::MissingParent` when a referenced parent id is not
    ///   part of the record set.
    /// - `ForestError::Remote` when the list request fails.
    pub async fn load(repo: R) -> ForestResult<Self> {
        let records = repo.list_units().await?;
        let roots = compose(records)?;
        Ok(Self { repo, roots })
    }

    /// Returns the ordered root units.
    pub fn roots(&self) -> &[OrganizationNode] {
        &self.roots
    }

    /// Returns the node with `id`, searching pre-order across all roots.
    ///
    /// Duplicate ids are a data-integrity precondition of the input; the
    /// first match in traversal order wins.
    pub fn find(&self, id: OrgUnitId) -> Option<&OrganizationNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// Visits every node exactly once: pre-order, depth-first,
    /// left-to-right among siblings, over roots in input order.
    pub fn each<F>(&self, mut visit: F)
    where
        F: FnMut(&OrganizationNode),
    {
        for node in self.iter() {
            visit(node);
        }
    }

    /// Returns a pre-order iterator over the whole forest.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Returns the total number of units in the forest.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Creates a new unit under `parent_id` through the remote store.
    ///
    /// The parent must resolve locally before any remote request is
    /// issued, so a caller addressing a bad attachment point never
    /// reaches the remote. On success the confirmed record is linked
    /// under the parent reported by the response and the new node is
    /// returned. On failure the forest is untouched.
    pub async fn create(&mut self, parent_id: OrgUnitId) -> ForestResult<&OrganizationNode> {
        if self.find(parent_id).is_none() {
            return Err(ForestError::NotFound(parent_id));
        }

        let record = self.repo.create_unit(parent_id).await?;
        let confirmed_parent = record.parent_id;
        let node = OrganizationNode::from_record(record);
        let id = node.id();

        let parent = self
            .find_mut(confirmed_parent)
            .ok_or(ForestError::NotFound(confirmed_parent))?;
        parent.append_child(node);
        self.find(id).ok_or(ForestError::NotFound(id))
    }

    /// Renames one unit through the remote store.
    ///
    /// The local name is set to the value echoed by the response, which
    /// may differ from the value sent. On failure the local name is left
    /// untouched.
    pub async fn rename(&mut self, id: OrgUnitId, new_name: &str) -> ForestResult<&OrganizationNode> {
        let requested = new_name.trim();
        if requested.is_empty() {
            return Err(ForestError::BlankName);
        }
        if self.find(id).is_none() {
            return Err(ForestError::NotFound(id));
        }

        let receipt = self.repo.rename_unit(id, requested).await?;
        let target = receipt.id;
        let node = self
            .find_mut(target)
            .ok_or(ForestError::NotFound(target))?;
        node.set_name(receipt.name);
        self.find(target).ok_or(ForestError::NotFound(target))
    }

    /// Removes one unit and its whole subtree through the remote store.
    ///
    /// Root-level units are rejected up front. On success the node is
    /// detached from its parent and the owned subtree is returned to the
    /// caller; children travel with their parent rather than being
    /// tracked independently. On failure the forest is untouched.
    pub async fn remove(&mut self, id: OrgUnitId) -> ForestResult<OrganizationNode> {
        let node = self.find(id).ok_or(ForestError::NotFound(id))?;
        if node.is_root() {
            return Err(ForestError::RootNotRemovable(id));
        }

        let receipt = self.repo.remove_unit(id).await?;
        self.detach(receipt.id)
            .ok_or(ForestError::NotFound(receipt.id))
    }

    fn find_mut(&mut self, id: OrgUnitId) -> Option<&mut OrganizationNode> {
        self.roots
            .iter_mut()
            .find_map(|root| find_in_subtree(root, id))
    }

    /// Detaches the node with `id` from its parent, re-deriving the
    /// parent from the node's own `parent_id`.
    fn detach(&mut self, id: OrgUnitId) -> Option<OrganizationNode> {
        let parent_id = self.find(id)?.parent_id();
        self.find_mut(parent_id)?.remove_child(id)
    }
}

/// Pre-order iterator over a forest: node before descendants, siblings
/// left-to-right, roots in input order.
pub struct PreOrder<'a> {
    stack: Vec<&'a OrganizationNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a OrganizationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

fn find_in_subtree(node: &mut OrganizationNode, id: OrgUnitId) -> Option<&mut OrganizationNode> {
    if node.id() == id {
        return Some(node);
    }
    node.children_mut()
        .iter_mut()
        .find_map(|child| find_in_subtree(child, id))
}

/// Composes flat records into linked root trees.
///
/// One validation pass checks that every referenced parent id exists in
/// the record set, then records are bucketed by parent id and built
/// recursively. Parent discovery is by id, never by array position, so
/// a parent record may appear anywhere in the input.
fn compose(records: Vec<OrganizationRecord>) -> ForestResult<Vec<OrganizationNode>> {
    let known_ids: HashSet<OrgUnitId> = records.iter().map(|record| record.id).collect();
    for record in &records {
        if !record.is_root() && !known_ids.contains(&record.parent_id) {
            return Err(ForestError::MissingParent {
                id: record.id,
                parent_id: record.parent_id,
            });
        }
    }

    let mut children_of: HashMap<OrgUnitId, Vec<OrganizationRecord>> = HashMap::new();
    let mut root_records = Vec::new();
    for record in records {
        if record.is_root() {
            root_records.push(record);
        } else {
            children_of.entry(record.parent_id).or_default().push(record);
        }
    }

    Ok(root_records
        .into_iter()
        .map(|record| build_subtree(record, &mut children_of))
        .collect())
}

fn build_subtree(
    record: OrganizationRecord,
    children_of: &mut HashMap<OrgUnitId, Vec<OrganizationRecord>>,
) -> OrganizationNode {
    let mut node = OrganizationNode::from_record(record);
    if let Some(child_records) = children_of.remove(&node.id()) {
        for child in child_records {
            node.append_child(build_subtree(child, children_of));
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::{compose, ForestError};
    use crate::model::organization::{OrganizationRecord, NO_PARENT};

    fn record(id: i64, name: &str, parent_id: i64, depth: i64) -> OrganizationRecord {
        OrganizationRecord {
            id,
            name: name.to_string(),
            parent_id,
            depth,
        }
    }

    #[test]
    fn compose_keeps_root_and_sibling_input_order() {
        let roots = compose(vec![
            record(10, "Second company", NO_PARENT, 0),
            record(3, "Beta", 10, 1),
            record(7, "First bucket", NO_PARENT, 0),
            record(2, "Alpha", 10, 1),
        ])
        .expect("well-formed records should compose");

        let root_ids: Vec<i64> = roots.iter().map(|node| node.id()).collect();
        assert_eq!(root_ids, vec![10, 7]);

        let child_ids: Vec<i64> = roots[0].children().iter().map(|node| node.id()).collect();
        assert_eq!(child_ids, vec![3, 2]);
    }

    #[test]
    fn compose_attaches_child_listed_before_its_parent() {
        let roots = compose(vec![
            record(2, "Platform", 0, 1),
            record(0, "Company", NO_PARENT, 0),
        ])
        .expect("parent position in the list must not matter");

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children().len(), 1);
        assert_eq!(roots[0].children()[0].id(), 2);
    }

    #[test]
    fn compose_rejects_missing_parent_reference() {
        let err = compose(vec![
            record(0, "Company", NO_PARENT, 0),
            record(5, "Orphan", 99, 1),
        ])
        .expect_err("missing parent must be a structural error");

        assert!(matches!(
            err,
            ForestError::MissingParent { id: 5, parent_id: 99 }
        ));
    }

    #[test]
    fn compose_of_empty_input_yields_empty_forest() {
        let roots = compose(Vec::new()).expect("empty input should compose");
        assert!(roots.is_empty());
    }
}
