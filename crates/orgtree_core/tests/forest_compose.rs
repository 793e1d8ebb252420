use async_trait::async_trait;
use orgtree_core::{
    ForestError, OrgUnitId, OrganizationForest, OrganizationRecord, OrganizationRepository,
    RemoteResult, RemoveReceipt, RenameReceipt, NO_PARENT,
};
use std::collections::HashMap;

/// Read-only repository serving a fixed record list.
#[derive(Debug)]
struct FixedRepository {
    records: Vec<OrganizationRecord>,
}

impl FixedRepository {
    fn new(records: Vec<OrganizationRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl OrganizationRepository for FixedRepository {
    async fn list_units(&self) -> RemoteResult<Vec<OrganizationRecord>> {
        Ok(self.records.clone())
    }

    async fn create_unit(&self, _parent_id: OrgUnitId) -> RemoteResult<OrganizationRecord> {
        unreachable!("composition tests never create");
    }

    async fn rename_unit(&self, _id: OrgUnitId, _name: &str) -> RemoteResult<RenameReceipt> {
        unreachable!("composition tests never rename");
    }

    async fn remove_unit(&self, _id: OrgUnitId) -> RemoteResult<RemoveReceipt> {
        unreachable!("composition tests never remove");
    }
}

fn record(id: i64, name: &str, parent_id: i64, depth: i64) -> OrganizationRecord {
    OrganizationRecord {
        id,
        name: name.to_string(),
        parent_id,
        depth,
    }
}

fn sample_records() -> Vec<OrganizationRecord> {
    vec![
        record(0, "Company", NO_PARENT, 0),
        record(1, "Unassigned", NO_PARENT, 0),
        record(2, "Platform", 0, 1),
        record(3, "Product", 0, 1),
        record(4, "Infra", 2, 2),
        record(5, "SRE", 2, 2),
        record(6, "Design", 3, 2),
    ]
}

#[tokio::test]
async fn two_roots_and_one_child_compose_as_expected() {
    let forest = OrganizationForest::load(FixedRepository::new(vec![
        record(0, "Company", NO_PARENT, 0),
        record(1, "Unassigned", NO_PARENT, 0),
        record(2, "Platform", 0, 1),
    ]))
    .await
    .expect("well-formed records should compose");

    let root_ids: Vec<i64> = forest.roots().iter().map(|node| node.id()).collect();
    assert_eq!(root_ids, vec![0, 1]);

    let company = forest.find(0).expect("company root should resolve");
    assert!(company.has_children());
    assert_eq!(company.children().len(), 1);
    assert_eq!(company.children()[0].id(), 2);

    let unassigned = forest.find(1).expect("unassigned root should resolve");
    assert!(!unassigned.has_children());

    let platform = forest.find(2).expect("child should resolve");
    assert!(!platform.is_root());
    assert_eq!(platform.parent_id(), 0);
}

#[tokio::test]
async fn composition_does_not_depend_on_record_order() {
    let forest = OrganizationForest::load(FixedRepository::new(vec![
        record(4, "Infra", 2, 2),
        record(2, "Platform", 0, 1),
        record(0, "Company", NO_PARENT, 0),
    ]))
    .await
    .expect("parent position in the list must not matter");

    assert_eq!(forest.roots().len(), 1);
    let platform = forest.find(2).expect("platform should resolve");
    assert_eq!(platform.children().len(), 1);
    assert_eq!(platform.children()[0].id(), 4);
}

#[tokio::test]
async fn load_fails_on_missing_parent_reference() {
    let err = OrganizationForest::load(FixedRepository::new(vec![
        record(0, "Company", NO_PARENT, 0),
        record(5, "Orphan", 99, 1),
    ]))
    .await
    .expect_err("a dangling parent reference must fail composition");

    assert!(matches!(
        err,
        ForestError::MissingParent { id: 5, parent_id: 99 }
    ));
}

#[tokio::test]
async fn each_visits_every_record_exactly_once() {
    let forest = OrganizationForest::load(FixedRepository::new(sample_records()))
        .await
        .expect("sample records should compose");

    let mut visit_counts: HashMap<i64, usize> = HashMap::new();
    forest.each(|node| {
        *visit_counts.entry(node.id()).or_default() += 1;
    });

    assert_eq!(visit_counts.len(), 7);
    assert!(visit_counts.values().all(|count| *count == 1));
    assert_eq!(forest.len(), 7);

    // Parent linkage: every non-root node is listed among its parent's
    // children, and only there.
    for source in sample_records() {
        if source.is_root() {
            continue;
        }
        let parent = forest
            .find(source.parent_id)
            .expect("parent should resolve");
        let occurrences = parent
            .children()
            .iter()
            .filter(|child| child.id() == source.id)
            .count();
        assert_eq!(occurrences, 1, "unit {} under parent {}", source.id, source.parent_id);
    }
}

#[tokio::test]
async fn traversal_is_preorder_and_deterministic() {
    let forest = OrganizationForest::load(FixedRepository::new(sample_records()))
        .await
        .expect("sample records should compose");

    let mut first_pass = Vec::new();
    forest.each(|node| first_pass.push(node.id()));
    assert_eq!(first_pass, vec![0, 2, 4, 5, 3, 6, 1]);

    let second_pass: Vec<i64> = forest.iter().map(|node| node.id()).collect();
    assert_eq!(first_pass, second_pass);
}

#[tokio::test]
async fn find_returns_none_for_unknown_id() {
    let forest = OrganizationForest::load(FixedRepository::new(sample_records()))
        .await
        .expect("sample records should compose");

    assert!(forest.find(42).is_none());
}

#[tokio::test]
async fn empty_record_list_composes_empty_forest() {
    let forest = OrganizationForest::load(FixedRepository::new(Vec::new()))
        .await
        .expect("an empty record list is a valid forest");

    assert!(forest.is_empty());
    assert_eq!(forest.len(), 0);
    assert!(forest.find(0).is_none());
}

#[tokio::test]
async fn root_order_follows_input_order() {
    let forest = OrganizationForest::load(FixedRepository::new(vec![
        record(7, "Later company", NO_PARENT, 0),
        record(0, "Company", NO_PARENT, 0),
        record(1, "Unassigned", NO_PARENT, 0),
    ]))
    .await
    .expect("roots should compose");

    let root_ids: Vec<i64> = forest.roots().iter().map(|node| node.id()).collect();
    assert_eq!(root_ids, vec![7, 0, 1]);
}
