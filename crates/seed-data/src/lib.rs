//! Sample data seeding for the decision ledger table.
//!
//! This crate fills a DynamoDB table (or DynamoDB Local) with a small,
//! hand-authored ledger for local development and demos: two projects, their
//! members, and four decisions, one of which supersedes another.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = SeedConfig::default();
//! let store = DynamoStore::connect(&config).await;
//! let seeder = Seeder::new(store, &config.table_name).with_write_mode(config.write_mode());
//!
//! let result = ScenarioBuilder::from_config(&config).build(&seeder).await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;

// Re-export the domain types from the ledger crate
pub use ledger::{
    Clock, Decision, DecisionStatus, MemberRole, Participant, ParticipantRole, Project,
    ProjectMember, SourceType, timestamp_now, timestamp_past,
};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ScenarioBuilder, ScenarioMetrics, ScenarioResult, build_and_submit};
    pub use crate::config::SeedConfig;
    pub use crate::db::{
        DynamoStore, FromItem, ItemStore, MemoryStore, SeedError, Seeder, ToItem, WriteMode,
        WriteTally,
    };
    pub use crate::generators::{
        DecisionGenerator, IdGenerator, MemberGenerator, ProjectGenerator, generate_identifier,
    };
    pub use crate::{Clock, Decision, DecisionStatus, Project, ProjectMember};
}
