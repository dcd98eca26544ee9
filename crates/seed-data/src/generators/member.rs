//! Project membership generation.

use ledger::{Clock, LedgerError, MemberRole, Project, ProjectMember};

/// A membership to create, addressed by the index of the project it joins.
#[derive(Debug, Clone)]
pub struct MembershipTemplate {
    pub project_index: usize,
    pub user_id: &'static str,
    pub role: MemberRole,
    pub joined_days_ago: u32,
}

/// Two members per sample project. U001 belongs to both.
pub const SAMPLE_MEMBERSHIPS: &[MembershipTemplate] = &[
    MembershipTemplate {
        project_index: 0,
        user_id: "U001",
        role: MemberRole::Admin,
        joined_days_ago: 30,
    },
    MembershipTemplate {
        project_index: 0,
        user_id: "U002",
        role: MemberRole::Member,
        joined_days_ago: 25,
    },
    MembershipTemplate {
        project_index: 1,
        user_id: "U001",
        role: MemberRole::Member,
        joined_days_ago: 60,
    },
    MembershipTemplate {
        project_index: 1,
        user_id: "U003",
        role: MemberRole::Admin,
        joined_days_ago: 60,
    },
];

/// Generates project memberships.
pub struct MemberGenerator {
    templates: Vec<MembershipTemplate>,
}

impl MemberGenerator {
    pub fn new() -> Self {
        Self {
            templates: SAMPLE_MEMBERSHIPS.to_vec(),
        }
    }

    pub fn with_templates(templates: Vec<MembershipTemplate>) -> Self {
        Self { templates }
    }

    /// Generates memberships for `projects`.
    ///
    /// Templates pointing past the end of `projects` are skipped.
    pub fn generate(
        &self,
        projects: &[Project],
        clock: &Clock,
    ) -> Result<Vec<ProjectMember>, LedgerError> {
        let mut members = Vec::with_capacity(self.templates.len());
        for template in &self.templates {
            let Some(project) = projects.get(template.project_index) else {
                continue;
            };
            members.push(ProjectMember {
                project_id: project.id,
                user_id: template.user_id.to_string(),
                role: template.role,
                created_at: clock.days_ago(template.joined_days_ago)?,
            });
        }
        Ok(members)
    }
}

impl Default for MemberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{IdGenerator, ProjectGenerator};

    #[test]
    fn test_two_members_per_project() {
        let clock = Clock::now();
        let projects = ProjectGenerator::new()
            .generate(&mut IdGenerator::random(), &clock)
            .unwrap();
        let members = MemberGenerator::new().generate(&projects, &clock).unwrap();

        assert_eq!(members.len(), 4);
        for project in &projects {
            let count = members.iter().filter(|m| m.project_id == project.id).count();
            assert_eq!(count, 2);
        }

        let u001: Vec<_> = members.iter().filter(|m| m.user_id == "U001").collect();
        assert_eq!(u001.len(), 2);
        assert_eq!(u001[0].role, MemberRole::Admin);
        assert_eq!(u001[1].role, MemberRole::Member);
    }

    #[test]
    fn test_skips_missing_projects() {
        let clock = Clock::now();
        let mut projects = ProjectGenerator::new()
            .generate(&mut IdGenerator::random(), &clock)
            .unwrap();
        projects.truncate(1);

        let members = MemberGenerator::new().generate(&projects, &clock).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.project_id == projects[0].id));
    }
}
