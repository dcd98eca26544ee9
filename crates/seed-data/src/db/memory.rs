//! In-process [`ItemStore`] with the ledger table's key schema.
//!
//! Used by tests and for trying the seeder without DynamoDB Local. Tables have
//! to be created up front, as provisioning is not the seeder's job. Index
//! queries scan the table, which is fine for a few dozen items.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use ledger::LedgerIndex;
use ledger::schema::{ATTR_PK, ATTR_SK};
use tokio::sync::Mutex;

use super::codec::Item;
use super::store::{ItemStore, PutOutcome, StoreError, WriteMode};

type Key = (String, String);
type Table = BTreeMap<Key, Item>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds an empty table called `name`.
    pub fn with_table(name: impl Into<String>) -> Self {
        Self {
            tables: Mutex::new(HashMap::from([(name.into(), Table::new())])),
        }
    }

    pub async fn create_table(&self, name: impl Into<String>) {
        self.tables.lock().await.entry(name.into()).or_default();
    }

    /// All items in key order.
    pub async fn items(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.lock().await;
        let table = lookup(&tables, table)?;
        Ok(table.values().cloned().collect())
    }

    pub async fn len(&self, table: &str) -> Result<usize, StoreError> {
        let tables = self.tables.lock().await;
        Ok(lookup(&tables, table)?.len())
    }

    pub async fn get(&self, table: &str, pk: &str, sk: &str) -> Result<Option<Item>, StoreError> {
        let tables = self.tables.lock().await;
        let key = (pk.to_string(), sk.to_string());
        Ok(lookup(&tables, table)?.get(&key).cloned())
    }

    /// Items in one partition, ordered by sort key.
    pub async fn query(&self, table: &str, pk: &str) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(lookup(&tables, table)?
            .iter()
            .filter(|((item_pk, _), _)| item_pk == pk)
            .map(|(_, item)| item.clone())
            .collect())
    }

    /// Items whose index partition attribute equals `value`, ordered by the
    /// index sort attribute. Items without the attribute are not indexed.
    pub async fn query_index(
        &self,
        table: &str,
        index: LedgerIndex,
        value: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.lock().await;
        let partition = index.partition_attribute();

        let mut matches: Vec<Item> = lookup(&tables, table)?
            .values()
            .filter(|item| string_attr(item, partition) == Some(value))
            .cloned()
            .collect();

        if let Some(sort) = index.sort_attribute() {
            matches.sort_by(|a, b| string_attr(a, sort).cmp(&string_attr(b, sort)));
        }
        Ok(matches)
    }
}

fn lookup<'a>(tables: &'a HashMap<String, Table>, name: &str) -> Result<&'a Table, StoreError> {
    tables
        .get(name)
        .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(String::as_str)
}

/// Extracts the primary key, rejecting items that violate the key schema.
fn item_key(item: &Item) -> Result<Key, StoreError> {
    let part = |name: &str| {
        string_attr(item, name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                StoreError::Rejected(format!("missing or non-string key attribute {name}"))
            })
    };
    Ok((part(ATTR_PK)?, part(ATTR_SK)?))
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put_item(
        &self,
        table: &str,
        item: Item,
        mode: WriteMode,
    ) -> Result<PutOutcome, StoreError> {
        let mut tables = self.tables.lock().await;
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let key = item_key(&item)?;

        if mode == WriteMode::IfAbsent && items.contains_key(&key) {
            return Ok(PutOutcome::Skipped);
        }
        items.insert(key, item);
        Ok(PutOutcome::Written)
    }
}
