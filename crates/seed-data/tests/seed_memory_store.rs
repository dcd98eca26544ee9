//! End-to-end seeding against the in-memory store.
//!
//! These tests run the same path as the `seed` binary, minus the DynamoDB
//! client: build the sample ledger, write it through a [`Seeder`], then read
//! the items back and check the relationships between them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ledger::LedgerIndex;
use ledger::schema::{ATTR_ENTITY_TYPE, EntityType, parse_project_pk};
use seed_data::db::{Item, PutOutcome, StoreError};
use seed_data::prelude::*;

const TABLE: &str = "decision-ledger";

fn entity_items(items: &[Item], entity_type: EntityType) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| {
            item.get(ATTR_ENTITY_TYPE)
                .and_then(|v| v.as_s().ok())
                .is_some_and(|s| s == entity_type.as_str())
        })
        .collect()
}

struct Stored {
    projects: Vec<Project>,
    members: Vec<(String, ProjectMember)>,
    decisions: Vec<Decision>,
}

async fn read_back(store: &MemoryStore) -> Stored {
    let items = store.items(TABLE).await.unwrap();

    let projects = entity_items(&items, EntityType::Project)
        .into_iter()
        .map(|item| Project::from_item(item).unwrap())
        .collect();
    let members = entity_items(&items, EntityType::ProjectMember)
        .into_iter()
        .map(|item| {
            let pk = item["PK"].as_s().unwrap().clone();
            (pk, ProjectMember::from_item(item).unwrap())
        })
        .collect();
    let decisions = entity_items(&items, EntityType::Decision)
        .into_iter()
        .map(|item| Decision::from_item(item).unwrap())
        .collect();

    Stored {
        projects,
        members,
        decisions,
    }
}

/// Fails the n-th put (1-based) and forwards every other put.
struct FailingStore {
    inner: MemoryStore,
    fail_on: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl ItemStore for FailingStore {
    async fn put_item(
        &self,
        table: &str,
        item: Item,
        mode: WriteMode,
    ) -> Result<PutOutcome, StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(StoreError::Rejected(
                "ProvisionedThroughputExceededException".to_string(),
            ));
        }
        self.inner.put_item(table, item, mode).await
    }
}

#[tokio::test]
async fn test_seed_empty_table() {
    let store = MemoryStore::with_table(TABLE);
    let result = build_and_submit(&store, TABLE).await.unwrap();

    assert_eq!(result.writes.written, 10);
    assert_eq!(store.len(TABLE).await.unwrap(), 10);

    let stored = read_back(&store).await;
    assert_eq!(stored.projects.len(), 2);
    assert_eq!(stored.members.len(), 4);
    assert_eq!(stored.decisions.len(), 4);

    let project_ids: HashSet<_> = stored.projects.iter().map(|p| p.id).collect();
    let decision_ids: HashSet<_> = stored.decisions.iter().map(|d| d.id).collect();
    assert_eq!(project_ids.len(), 2);
    assert_eq!(decision_ids.len(), 4);

    for (pk, member) in &stored.members {
        assert_eq!(parse_project_pk(pk), Some(member.project_id));
        assert!(project_ids.contains(&member.project_id));
    }
}

#[tokio::test]
async fn test_supersession_pair_is_linked() {
    let store = MemoryStore::with_table(TABLE);
    let result = build_and_submit(&store, TABLE).await.unwrap();
    let stored = read_back(&store).await;

    let superseded: Vec<_> = stored
        .decisions
        .iter()
        .filter(|d| d.status == DecisionStatus::Superseded)
        .collect();
    assert_eq!(superseded.len(), 1);
    let original = superseded[0];

    let successors: Vec<_> = stored
        .decisions
        .iter()
        .filter(|d| d.supersedes_id == Some(original.id))
        .collect();
    assert_eq!(successors.len(), 1);
    let replacement = successors[0];
    assert_ne!(replacement.id, original.id);
    assert_eq!(replacement.project_id, original.project_id);

    // Decision 1 is the original, decision 4 the replacement
    assert_eq!(original.id, result.decisions[0].id);
    assert_eq!(replacement.id, result.decisions[3].id);
    for earlier in [
        original.created_at,
        original.updated_at,
        original.source_timestamp,
    ] {
        for later in [
            replacement.created_at,
            replacement.updated_at,
            replacement.source_timestamp,
        ] {
            assert!(earlier < later);
        }
    }

    let found = store
        .query_index(TABLE, LedgerIndex::Supersedes, &original.id.to_string())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(Decision::from_item(&found[0]).unwrap().id, replacement.id);
}

#[tokio::test]
async fn test_status_index_matches_status() {
    let store = MemoryStore::with_table(TABLE);
    let result = build_and_submit(&store, TABLE).await.unwrap();

    for decision in &result.decisions {
        let item = store
            .get(TABLE, &decision.pk(), "METADATA")
            .await
            .unwrap()
            .unwrap();
        let expected = format!("{}#{}", decision.status.as_str(), decision.project_id);
        assert_eq!(item["gsi3_pk"].as_s().unwrap(), &expected);
    }

    let backend = &result.projects[0];
    let confirmed = store
        .query_index(
            TABLE,
            LedgerIndex::StatusFilter,
            &format!("confirmed#{}", backend.id),
        )
        .await
        .unwrap();
    let summaries: Vec<_> = confirmed
        .iter()
        .map(|item| item["summary"].as_s().unwrap().as_str())
        .collect();
    assert_eq!(
        summaries,
        vec!["Use DynamoDB for the new service", "Launch date moved to April 1st"]
    );
}

#[tokio::test]
async fn test_user_projects_index() {
    let store = MemoryStore::with_table(TABLE);
    let result = build_and_submit(&store, TABLE).await.unwrap();

    let memberships = store
        .query_index(TABLE, LedgerIndex::UserProjects, "U001")
        .await
        .unwrap();
    let projects: HashSet<_> = memberships
        .iter()
        .map(|item| item["PK"].as_s().unwrap().clone())
        .collect();
    let expected: HashSet<_> = result.projects.iter().map(|p| p.pk()).collect();
    assert_eq!(projects, expected);
}

#[tokio::test]
async fn test_reruns_duplicate() {
    let store = MemoryStore::with_table(TABLE);
    let runs = 3;
    for _ in 0..runs {
        build_and_submit(&store, TABLE).await.unwrap();
    }

    let stored = read_back(&store).await;
    assert_eq!(stored.projects.len(), 2 * runs);
    assert_eq!(stored.members.len(), 4 * runs);
    assert_eq!(stored.decisions.len(), 4 * runs);
}

#[tokio::test]
async fn test_seeded_reruns_converge() {
    let store = MemoryStore::with_table(TABLE);
    let seeder = Seeder::new(&store, TABLE).with_write_mode(WriteMode::IfAbsent);

    let first = ScenarioBuilder::new()
        .with_seed(12345)
        .build(&seeder)
        .await
        .unwrap();
    let second = ScenarioBuilder::new()
        .with_seed(12345)
        .build(&seeder)
        .await
        .unwrap();

    assert_eq!(first.writes, WriteTally { written: 10, skipped: 0 });
    assert_eq!(second.writes, WriteTally { written: 0, skipped: 10 });
    assert_eq!(store.len(TABLE).await.unwrap(), 10);
    assert_eq!(first.projects[0].id, second.projects[0].id);
}

#[tokio::test]
async fn test_failure_aborts_remaining_writes() {
    let store = FailingStore {
        inner: MemoryStore::with_table(TABLE),
        fail_on: 4,
        calls: AtomicUsize::new(0),
    };
    let seeder = Seeder::new(&store, TABLE);

    let err = ScenarioBuilder::new().build(&seeder).await.unwrap_err();
    assert!(matches!(err, SeedError::Store(StoreError::Rejected(_))));

    // Both projects and the first member made it; nothing is rolled back
    assert_eq!(store.calls.load(Ordering::SeqCst), 4);
    assert_eq!(store.inner.len(TABLE).await.unwrap(), 3);
    let stored = read_back(&store.inner).await;
    assert_eq!(stored.projects.len(), 2);
    assert_eq!(stored.members.len(), 1);
    assert!(stored.decisions.is_empty());
}

#[tokio::test]
async fn test_missing_table_writes_nothing() {
    let store = MemoryStore::new();
    let err = build_and_submit(&store, TABLE).await.unwrap_err();
    assert!(matches!(err, SeedError::Store(StoreError::TableNotFound(_))));
}
