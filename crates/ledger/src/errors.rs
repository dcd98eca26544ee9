use thiserror::Error;
use uuid::Uuid;

use crate::models::DecisionStatus;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Duplicate project id: {0}")]
    DuplicateProject(Uuid),

    #[error("Duplicate decision id: {0}")]
    DuplicateDecision(Uuid),

    #[error("User {user_id} is a member of project {project_id} more than once")]
    DuplicateMember { project_id: Uuid, user_id: String },

    #[error("Member {user_id} references unknown project {project_id}")]
    MemberWithoutProject { project_id: Uuid, user_id: String },

    #[error("Decision {decision_id} references unknown project {project_id}")]
    DecisionWithoutProject { decision_id: Uuid, project_id: Uuid },

    #[error("Decision {decision_id} supersedes unknown decision {supersedes_id}")]
    UnknownSupersededDecision { decision_id: Uuid, supersedes_id: Uuid },

    #[error("Decision {0} cannot supersede itself")]
    SelfSupersession(Uuid),

    #[error("Decision {decision_id} supersedes {supersedes_id} from a different project")]
    CrossProjectSupersession { decision_id: Uuid, supersedes_id: Uuid },

    #[error("Decision {0} is superseded but nothing supersedes it")]
    OrphanedSupersession(Uuid),

    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition {
        from: DecisionStatus,
        to: DecisionStatus,
    },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0} days back is outside the storable timestamp range")]
    TimestampOutOfRange(u32),
}
