//! Domain model for the decision ledger.
//!
//! The ledger keeps three kinds of entity in a single DynamoDB table:
//!
//! - [`Project`]: `PROJECT#{id}` / `METADATA`
//! - [`ProjectMember`]: `PROJECT#{project_id}` / `MEMBER#{user_id}`
//! - [`Decision`]: `DECISION#{id}` / `METADATA`
//!
//! This crate holds the typed records, the key and index layout in [`schema`],
//! and the referential checks in [`integrity`]. It has no storage dependency;
//! mapping records to attribute maps happens at the store boundary.

pub mod errors;
pub mod integrity;
pub mod models;
pub mod schema;
pub mod timestamps;

pub use errors::LedgerError;
pub use integrity::validate_ledger;
pub use models::{
    Decision, DecisionStatus, MemberRole, Participant, ParticipantRole, Project, ProjectMember,
    SourceType,
};
pub use schema::{EntityType, LedgerIndex};
pub use timestamps::{Clock, format_timestamp, parse_timestamp, timestamp_now, timestamp_past};
