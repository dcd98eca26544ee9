//! Application-level referential checks.
//!
//! The table enforces nothing beyond its key schema, so these checks are the
//! only thing standing between a bad dataset and corrupted index queries.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::errors::LedgerError;
use crate::models::{Decision, DecisionStatus, Project, ProjectMember};

/// Checks that a set of records forms a consistent ledger.
///
/// - project ids and decision ids are unique
/// - every member and decision points at one of the given projects
/// - a user appears at most once per project
/// - `supersedes_id` names another decision in the same project
/// - every superseded decision has at least one successor
pub fn validate_ledger(
    projects: &[Project],
    members: &[ProjectMember],
    decisions: &[Decision],
) -> Result<(), LedgerError> {
    let mut project_ids = HashSet::new();
    for project in projects {
        if !project_ids.insert(project.id) {
            return Err(LedgerError::DuplicateProject(project.id));
        }
    }

    let mut memberships = HashSet::new();
    for member in members {
        if !project_ids.contains(&member.project_id) {
            return Err(LedgerError::MemberWithoutProject {
                project_id: member.project_id,
                user_id: member.user_id.clone(),
            });
        }
        if !memberships.insert((member.project_id, member.user_id.as_str())) {
            return Err(LedgerError::DuplicateMember {
                project_id: member.project_id,
                user_id: member.user_id.clone(),
            });
        }
    }

    let mut decision_projects: HashMap<Uuid, Uuid> = HashMap::new();
    for decision in decisions {
        if decision_projects
            .insert(decision.id, decision.project_id)
            .is_some()
        {
            return Err(LedgerError::DuplicateDecision(decision.id));
        }
        if !project_ids.contains(&decision.project_id) {
            return Err(LedgerError::DecisionWithoutProject {
                decision_id: decision.id,
                project_id: decision.project_id,
            });
        }
    }

    let mut superseded = HashSet::new();
    for decision in decisions {
        let Some(supersedes_id) = decision.supersedes_id else {
            continue;
        };
        if supersedes_id == decision.id {
            return Err(LedgerError::SelfSupersession(decision.id));
        }
        match decision_projects.get(&supersedes_id) {
            None => {
                return Err(LedgerError::UnknownSupersededDecision {
                    decision_id: decision.id,
                    supersedes_id,
                });
            }
            Some(project_id) if *project_id != decision.project_id => {
                return Err(LedgerError::CrossProjectSupersession {
                    decision_id: decision.id,
                    supersedes_id,
                });
            }
            Some(_) => {
                superseded.insert(supersedes_id);
            }
        }
    }

    if let Some(orphan) = decisions
        .iter()
        .find(|d| d.status == DecisionStatus::Superseded && !superseded.contains(&d.id))
    {
        return Err(LedgerError::OrphanedSupersession(orphan.id));
    }

    Ok(())
}
