//! Sample project generation.

use ledger::{Clock, LedgerError, Project};

use super::ids::IdGenerator;

/// Hand-authored description of a sample project.
#[derive(Debug, Clone)]
pub struct ProjectTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub slack_channels: &'static [&'static str],
    pub auto_confirm_meeting_decisions: bool,
    pub notification_channel: &'static str,
    pub created_days_ago: u32,
    pub updated_days_ago: u32,
}

/// The projects every seeding run creates.
pub const SAMPLE_PROJECTS: &[ProjectTemplate] = &[
    ProjectTemplate {
        name: "Backend Rewrite",
        description: "Modernizing the backend infrastructure",
        slack_channels: &["#backend", "#engineering"],
        auto_confirm_meeting_decisions: false,
        notification_channel: "#backend-decisions",
        created_days_ago: 30,
        updated_days_ago: 30,
    },
    ProjectTemplate {
        name: "Mobile App v2",
        description: "Next generation mobile application",
        slack_channels: &["#mobile", "#product"],
        auto_confirm_meeting_decisions: true,
        notification_channel: "#mobile-updates",
        created_days_ago: 60,
        updated_days_ago: 15,
    },
];

/// Generates projects from templates.
pub struct ProjectGenerator {
    templates: Vec<ProjectTemplate>,
}

impl ProjectGenerator {
    /// Creates a generator for the sample projects.
    pub fn new() -> Self {
        Self {
            templates: SAMPLE_PROJECTS.to_vec(),
        }
    }

    pub fn with_templates(templates: Vec<ProjectTemplate>) -> Self {
        Self { templates }
    }

    /// Generates one project per template, in template order.
    pub fn generate(
        &self,
        ids: &mut IdGenerator,
        clock: &Clock,
    ) -> Result<Vec<Project>, LedgerError> {
        self.templates
            .iter()
            .map(|template| {
                Ok(Project {
                    id: ids.next_id(),
                    name: template.name.to_string(),
                    description: template.description.to_string(),
                    slack_channels: template
                        .slack_channels
                        .iter()
                        .map(|c| c.to_string())
                        .collect(),
                    auto_confirm_meeting_decisions: template.auto_confirm_meeting_decisions,
                    notification_channel: template.notification_channel.to_string(),
                    created_at: clock.days_ago(template.created_days_ago)?,
                    updated_at: clock.days_ago(template.updated_days_ago)?,
                })
            })
            .collect()
    }
}

impl Default for ProjectGenerator {
    fn default() -> Self {
        Self::new()
    }
}
