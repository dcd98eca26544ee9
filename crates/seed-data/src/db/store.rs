//! The write boundary between the seeder and a table.

use async_trait::async_trait;
use thiserror::Error;

use super::codec::Item;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(#[from] Box<aws_sdk_dynamodb::Error>),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Item rejected: {0}")]
    Rejected(String),
}

/// How a put treats an item that already exists under the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace whatever is stored under the key.
    #[default]
    Overwrite,
    /// Leave an existing item alone and report the put as skipped.
    IfAbsent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Written,
    /// The item already existed and `WriteMode::IfAbsent` kept it.
    Skipped,
}

/// A table that accepts single-item writes.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn put_item(
        &self,
        table: &str,
        item: Item,
        mode: WriteMode,
    ) -> Result<PutOutcome, StoreError>;
}

#[async_trait]
impl<S: ItemStore + ?Sized> ItemStore for &S {
    async fn put_item(
        &self,
        table: &str,
        item: Item,
        mode: WriteMode,
    ) -> Result<PutOutcome, StoreError> {
        (**self).put_item(table, item, mode).await
    }
}
