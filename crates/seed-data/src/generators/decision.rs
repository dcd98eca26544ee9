//! Decision generation, including supersession links.

use ledger::{
    Clock, Decision, DecisionStatus, LedgerError, Participant, ParticipantRole, Project,
    SourceType,
};

use super::ids::IdGenerator;

/// Hand-authored description of a sample decision.
#[derive(Debug, Clone)]
pub struct DecisionTemplate {
    pub project_index: usize,
    pub summary: &'static str,
    pub context: &'static str,
    pub raw_content: &'static str,
    /// Status when captured. Superseded decisions start out confirmed.
    pub status: DecisionStatus,
    /// Index of the template this decision replaces.
    pub supersedes: Option<usize>,
    pub source_type: SourceType,
    pub source_channel: &'static str,
    pub source_url: Option<&'static str>,
    pub author: &'static str,
    pub participants: &'static [(&'static str, ParticipantRole)],
    pub tags: &'static [&'static str],
    pub days_ago: u32,
}

/// Four decisions: a launch date that is later moved, a confirmed database
/// choice, and an open framework question on the second project.
pub const SAMPLE_DECISIONS: &[DecisionTemplate] = &[
    DecisionTemplate {
        project_index: 0,
        summary: "Launch date set for March 15th",
        context: "Based on current progress and team capacity, we agreed on March 15th as the target launch date.",
        raw_content: "Team discussed timeline. Everyone agreed March 15th works. @DecisionLedger",
        status: DecisionStatus::Confirmed,
        supersedes: None,
        source_type: SourceType::Slack,
        source_channel: "#backend",
        source_url: Some("https://slack.com/archives/C001/p1234567890"),
        author: "U001",
        participants: &[
            ("Alice", ParticipantRole::Decider),
            ("Bob", ParticipantRole::Approver),
        ],
        tags: &["timeline", "launch"],
        days_ago: 20,
    },
    DecisionTemplate {
        project_index: 0,
        summary: "Use DynamoDB for the new service",
        context: "After evaluating PostgreSQL and DynamoDB, we chose DynamoDB for its serverless nature and scalability.",
        raw_content: "We're going with DynamoDB for the new service @DecisionLedger",
        status: DecisionStatus::Confirmed,
        supersedes: None,
        source_type: SourceType::Slack,
        source_channel: "#backend",
        source_url: Some("https://slack.com/archives/C001/p1234567891"),
        author: "U002",
        participants: &[
            ("Bob", ParticipantRole::Decider),
            ("Charlie", ParticipantRole::Contributor),
        ],
        tags: &["database", "infrastructure"],
        days_ago: 15,
    },
    DecisionTemplate {
        project_index: 1,
        summary: "Evaluating React Native vs Flutter for mobile app",
        context: "Team is researching both options. Will decide after POC phase.",
        raw_content: "We need to decide between React Native and Flutter @DecisionLedger",
        status: DecisionStatus::Open,
        supersedes: None,
        source_type: SourceType::Meeting,
        source_channel: "Weekly Standup",
        source_url: None,
        author: "U003",
        participants: &[
            ("Charlie", ParticipantRole::Contributor),
            ("Diana", ParticipantRole::Contributor),
        ],
        tags: &["mobile", "framework", "tech-stack"],
        days_ago: 5,
    },
    DecisionTemplate {
        project_index: 0,
        summary: "Launch date moved to April 1st",
        context: "Due to additional requirements, we're pushing the launch to April 1st.",
        raw_content: "Launch date moved to April 1st due to new requirements @DecisionLedger",
        status: DecisionStatus::Confirmed,
        supersedes: Some(0),
        source_type: SourceType::Slack,
        source_channel: "#backend",
        source_url: Some("https://slack.com/archives/C001/p1234567892"),
        author: "U001",
        participants: &[
            ("Alice", ParticipantRole::Decider),
            ("Bob", ParticipantRole::Approver),
        ],
        tags: &["timeline", "launch"],
        days_ago: 3,
    },
];

/// Generates decisions and links superseding decisions to their predecessors.
pub struct DecisionGenerator {
    templates: Vec<DecisionTemplate>,
}

impl DecisionGenerator {
    pub fn new() -> Self {
        Self {
            templates: SAMPLE_DECISIONS.to_vec(),
        }
    }

    pub fn with_templates(templates: Vec<DecisionTemplate>) -> Self {
        Self { templates }
    }

    /// Generates decisions for `projects`.
    ///
    /// Ids are drawn in template order before any links are made. Templates
    /// whose project is missing are skipped, and so is any link to them.
    pub fn generate(
        &self,
        projects: &[Project],
        ids: &mut IdGenerator,
        clock: &Clock,
    ) -> Result<Vec<Decision>, LedgerError> {
        let mut decisions = Vec::with_capacity(self.templates.len());
        let mut positions = Vec::with_capacity(self.templates.len());

        for template in &self.templates {
            let id = ids.next_id();
            let Some(project) = projects.get(template.project_index) else {
                positions.push(None);
                continue;
            };
            let captured_at = clock.days_ago(template.days_ago)?;

            positions.push(Some(decisions.len()));
            decisions.push(Decision {
                id,
                project_id: project.id,
                summary: template.summary.to_string(),
                context: template.context.to_string(),
                raw_content: template.raw_content.to_string(),
                status: template.status,
                supersedes_id: None,
                source_type: template.source_type,
                source_channel: template.source_channel.to_string(),
                source_url: template.source_url.map(str::to_string),
                source_timestamp: captured_at,
                author: template.author.to_string(),
                participants: template
                    .participants
                    .iter()
                    .map(|(name, role)| Participant::new(*name, *role))
                    .collect(),
                tags: template.tags.iter().map(|t| t.to_string()).collect(),
                created_at: captured_at,
                updated_at: captured_at,
            });
        }

        for (index, template) in self.templates.iter().enumerate() {
            let Some(predecessor) = template.supersedes else {
                continue;
            };
            let successor = positions[index];
            let predecessor = positions.get(predecessor).copied().flatten();
            if let (Some(successor), Some(predecessor)) = (successor, predecessor) {
                let (successor, predecessor) = pair_mut(&mut decisions, successor, predecessor)?;
                successor.supersede(predecessor)?;
            }
        }

        Ok(decisions)
    }
}

impl Default for DecisionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrows two distinct elements of a slice mutably.
fn pair_mut(
    decisions: &mut [Decision],
    a: usize,
    b: usize,
) -> Result<(&mut Decision, &mut Decision), LedgerError> {
    if a == b {
        return Err(LedgerError::SelfSupersession(decisions[a].id));
    }
    if a < b {
        let (left, right) = decisions.split_at_mut(b);
        Ok((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = decisions.split_at_mut(a);
        Ok((&mut right[0], &mut left[b]))
    }
}
