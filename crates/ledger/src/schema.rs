//! Single-table layout shared by every entity in the ledger table.
//!
//! Projects and their members share the `PROJECT#{id}` partition so that a
//! project's metadata and membership come back from one query. Decisions live
//! in their own `DECISION#{id}` partition and are reached through the global
//! secondary indexes listed below.

use uuid::Uuid;

use crate::models::DecisionStatus;

// Key attributes
pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_ENTITY_TYPE: &str = "entity_type";

// Shared attributes
pub const ATTR_ID: &str = "id";
pub const ATTR_PROJECT_ID: &str = "project_id";
pub const ATTR_USER_ID: &str = "user_id";
pub const ATTR_CREATED_AT: &str = "created_at";
pub const ATTR_UPDATED_AT: &str = "updated_at";

// Project attributes
pub const ATTR_NAME: &str = "name";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_SLACK_CHANNELS: &str = "slack_channels";
pub const ATTR_AUTO_CONFIRM: &str = "auto_confirm_meeting_decisions";
pub const ATTR_NOTIFICATION_CHANNEL: &str = "notification_channel";

// Member attributes
pub const ATTR_ROLE: &str = "role";

// Decision attributes
pub const ATTR_SUMMARY: &str = "summary";
pub const ATTR_CONTEXT: &str = "context";
pub const ATTR_RAW_CONTENT: &str = "raw_content";
pub const ATTR_STATUS: &str = "status";
pub const ATTR_SUPERSEDES_ID: &str = "supersedes_id";
pub const ATTR_SOURCE_TYPE: &str = "source_type";
pub const ATTR_SOURCE_CHANNEL: &str = "source_channel";
pub const ATTR_SOURCE_URL: &str = "source_url";
pub const ATTR_SOURCE_TIMESTAMP: &str = "source_timestamp";
pub const ATTR_AUTHOR: &str = "author";
pub const ATTR_PARTICIPANTS: &str = "participants";
pub const ATTR_PARTICIPANT_NAME: &str = "name";
pub const ATTR_PARTICIPANT_ROLE: &str = "role";
pub const ATTR_TAGS: &str = "tags";
pub const ATTR_STATUS_INDEX: &str = "gsi3_pk";

// Sort key for an entity's own metadata item
pub const SK_METADATA: &str = "METADATA";

const PROJECT_PREFIX: &str = "PROJECT#";
const MEMBER_PREFIX: &str = "MEMBER#";
const DECISION_PREFIX: &str = "DECISION#";

/// Global secondary indexes defined on the ledger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerIndex {
    /// Projects a user belongs to: `user_id` / `PK`.
    UserProjects,
    /// Decisions of a project in creation order: `project_id` / `created_at`.
    ProjectDecisions,
    /// Decisions of a project with a given status: `gsi3_pk` / `created_at`.
    StatusFilter,
    /// The decision that replaced a given decision: `supersedes_id`.
    Supersedes,
}

impl LedgerIndex {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerIndex::UserProjects => "GSI1-UserProjects",
            LedgerIndex::ProjectDecisions => "GSI2-ProjectDecisions",
            LedgerIndex::StatusFilter => "GSI3-StatusFilter",
            LedgerIndex::Supersedes => "GSI4-Supersedes",
        }
    }

    pub fn partition_attribute(&self) -> &'static str {
        match self {
            LedgerIndex::UserProjects => ATTR_USER_ID,
            LedgerIndex::ProjectDecisions => ATTR_PROJECT_ID,
            LedgerIndex::StatusFilter => ATTR_STATUS_INDEX,
            LedgerIndex::Supersedes => ATTR_SUPERSEDES_ID,
        }
    }

    pub fn sort_attribute(&self) -> Option<&'static str> {
        match self {
            LedgerIndex::UserProjects => Some(ATTR_PK),
            LedgerIndex::ProjectDecisions | LedgerIndex::StatusFilter => Some(ATTR_CREATED_AT),
            LedgerIndex::Supersedes => None,
        }
    }
}

/// Entity discriminator stored in `entity_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Project,
    ProjectMember,
    Decision,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Project => "PROJECT",
            EntityType::ProjectMember => "PROJECT_MEMBER",
            EntityType::Decision => "DECISION",
        }
    }
}

pub fn project_pk(project_id: Uuid) -> String {
    format!("{PROJECT_PREFIX}{project_id}")
}

pub fn member_sk(user_id: &str) -> String {
    format!("{MEMBER_PREFIX}{user_id}")
}

pub fn decision_pk(decision_id: Uuid) -> String {
    format!("{DECISION_PREFIX}{decision_id}")
}

/// Partition value of the status filter index: `{status}#{project_id}`.
pub fn status_index_key(status: DecisionStatus, project_id: Uuid) -> String {
    format!("{}#{}", status.as_str(), project_id)
}

/// Extracts the project id embedded in a `PROJECT#{id}` partition key.
pub fn parse_project_pk(pk: &str) -> Option<Uuid> {
    pk.strip_prefix(PROJECT_PREFIX)
        .and_then(|id| Uuid::parse_str(id).ok())
}

/// Extracts the user id embedded in a `MEMBER#{user_id}` sort key.
pub fn parse_member_sk(sk: &str) -> Option<&str> {
    sk.strip_prefix(MEMBER_PREFIX).filter(|id| !id.is_empty())
}
