//! Table access for seeding.
//!
//! The [`Seeder`] writes ledger records through any [`ItemStore`]:
//! [`DynamoStore`] for DynamoDB (local or AWS) and [`MemoryStore`] for tests.
//! Records become attribute maps only in [`codec`].

pub mod codec;
mod dynamo;
mod memory;
mod seeder;
mod store;

pub use codec::{CodecError, FromItem, Item, ToItem, item_to_json};
pub use dynamo::DynamoStore;
pub use memory::MemoryStore;
pub use seeder::{SeedError, Seeder, WriteTally};
pub use store::{ItemStore, PutOutcome, StoreError, WriteMode};
