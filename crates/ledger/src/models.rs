use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::schema;

/// Implements `as_str`, `Display` and `FromStr` for a unit enum stored as a string.
macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the stored string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(LedgerError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// A team workspace that decisions are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Slack channels whose messages are captured for this project.
    pub slack_channels: Vec<String>,
    /// Whether decisions captured from meeting notes skip manual confirmation.
    pub auto_confirm_meeting_decisions: bool,
    pub notification_channel: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Project {
    pub fn pk(&self) -> String {
        schema::project_pk(self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

string_enum!(MemberRole, "member role", {
    Admin => "admin",
    Member => "member",
});

/// Membership of a user in a project, stored in the project's partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub project_id: Uuid,
    /// Slack user id, e.g. `U001`.
    pub user_id: String,
    pub role: MemberRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProjectMember {
    pub fn pk(&self) -> String {
        schema::project_pk(self.project_id)
    }

    pub fn sk(&self) -> String {
        schema::member_sk(&self.user_id)
    }
}

/// Lifecycle of a decision. Statuses only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// Still under discussion.
    Open,
    Confirmed,
    /// Replaced by a later decision.
    Superseded,
}

string_enum!(DecisionStatus, "decision status", {
    Open => "open",
    Confirmed => "confirmed",
    Superseded => "superseded",
});

impl DecisionStatus {
    pub fn can_transition_to(&self, next: DecisionStatus) -> bool {
        next > *self
    }
}

/// Where a decision was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Slack,
    Meeting,
}

string_enum!(SourceType, "source type", {
    Slack => "slack",
    Meeting => "meeting",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Decider,
    Approver,
    Contributor,
}

string_enum!(ParticipantRole, "participant role", {
    Decider => "decider",
    Approver => "approver",
    Contributor => "contributor",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn new(name: impl Into<String>, role: ParticipantRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// A decision captured from a chat message or meeting note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub project_id: Uuid,
    pub summary: String,
    /// Rationale behind the decision.
    pub context: String,
    /// The captured source text, verbatim.
    pub raw_content: String,
    pub status: DecisionStatus,
    pub supersedes_id: Option<Uuid>,
    pub source_type: SourceType,
    /// Slack channel name or meeting title.
    pub source_channel: String,
    pub source_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub source_timestamp: OffsetDateTime,
    /// User id of whoever raised the decision.
    pub author: String,
    pub participants: Vec<Participant>,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Decision {
    pub fn pk(&self) -> String {
        schema::decision_pk(self.id)
    }

    /// Partition value for the status filter index, always derived from `status`.
    pub fn status_index_key(&self) -> String {
        schema::status_index_key(self.status, self.project_id)
    }

    /// Moves the decision to a later status and stamps `updated_at`.
    pub fn transition_to(
        &mut self,
        next: DecisionStatus,
        at: OffsetDateTime,
    ) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }

    /// Records that this decision replaces `predecessor`.
    ///
    /// Both decisions must belong to the same project. The predecessor is
    /// marked superseded; timestamps on either side are left untouched. A
    /// decision that is already superseded can gain further successors.
    pub fn supersede(&mut self, predecessor: &mut Decision) -> Result<(), LedgerError> {
        if predecessor.id == self.id {
            return Err(LedgerError::SelfSupersession(self.id));
        }
        if predecessor.project_id != self.project_id {
            return Err(LedgerError::CrossProjectSupersession {
                decision_id: self.id,
                supersedes_id: predecessor.id,
            });
        }
        if predecessor.status != DecisionStatus::Superseded
            && !predecessor.status.can_transition_to(DecisionStatus::Superseded)
        {
            return Err(LedgerError::IllegalTransition {
                from: predecessor.status,
                to: DecisionStatus::Superseded,
            });
        }

        predecessor.status = DecisionStatus::Superseded;
        self.supersedes_id = Some(predecessor.id);
        Ok(())
    }
}
