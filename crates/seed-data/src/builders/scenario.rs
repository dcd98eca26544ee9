//! Fluent builder for the sample ledger.

use std::time::Instant;

use ledger::{Clock, Decision, Project, ProjectMember, validate_ledger};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::info;

use crate::config::SeedConfig;
use crate::db::{Item, ItemStore, SeedError, Seeder, ToItem, WriteTally, item_to_json};
use crate::generators::{
    DecisionGenerator, DecisionTemplate, IdGenerator, MemberGenerator, MembershipTemplate,
    ProjectGenerator, ProjectTemplate, SAMPLE_DECISIONS, SAMPLE_MEMBERSHIPS, SAMPLE_PROJECTS,
};

/// Records built for a run, plus what happened when they were written.
#[derive(Debug, Serialize)]
pub struct ScenarioResult {
    pub projects: Vec<Project>,
    pub members: Vec<ProjectMember>,
    pub decisions: Vec<Decision>,
    /// Write counts across all entity kinds (zero if nothing was written).
    #[serde(skip)]
    pub writes: WriteTally,
    /// Populated if metrics tracking is enabled.
    #[serde(skip)]
    pub metrics: Option<ScenarioMetrics>,
}

impl ScenarioResult {
    /// The table items for every record, in write order.
    pub fn items(&self) -> Vec<Item> {
        self.projects
            .iter()
            .map(ToItem::to_item)
            .chain(self.members.iter().map(ToItem::to_item))
            .chain(self.decisions.iter().map(ToItem::to_item))
            .collect()
    }

    /// The items as DynamoDB JSON, exactly as they would be written.
    pub fn items_json(&self) -> Value {
        Value::Array(self.items().iter().map(item_to_json).collect())
    }
}

/// Timing and size of a scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioMetrics {
    pub generation_time_ms: u64,
    /// Zero when only `build_data` ran.
    pub seeding_time_ms: u64,
    pub project_count: usize,
    pub member_count: usize,
    pub decision_count: usize,
}

/// Builder for the ledger's sample dataset.
///
/// # Example
///
/// ```rust,ignore
/// let seeder = Seeder::new(DynamoStore::connect(&config).await, "decision-ledger");
/// let result = ScenarioBuilder::new()
///     .with_seed(12345)
///     .build(&seeder)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    projects: Vec<ProjectTemplate>,
    memberships: Vec<MembershipTemplate>,
    decisions: Vec<DecisionTemplate>,
    seed: Option<u64>,
    anchor: Option<OffsetDateTime>,
    track_metrics: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    /// Creates a builder for the standard sample dataset: two projects, four
    /// memberships and four decisions.
    pub fn new() -> Self {
        Self {
            projects: SAMPLE_PROJECTS.to_vec(),
            memberships: SAMPLE_MEMBERSHIPS.to_vec(),
            decisions: SAMPLE_DECISIONS.to_vec(),
            seed: None,
            anchor: None,
            track_metrics: false,
        }
    }

    /// Applies the seed from a run configuration.
    pub fn from_config(config: &SeedConfig) -> Self {
        let builder = Self::new();
        match config.seed {
            Some(seed) => builder.with_seed(seed),
            None => builder,
        }
    }

    pub fn with_projects(mut self, templates: Vec<ProjectTemplate>) -> Self {
        self.projects = templates;
        self
    }

    pub fn with_memberships(mut self, templates: Vec<MembershipTemplate>) -> Self {
        self.memberships = templates;
        self
    }

    pub fn with_decisions(mut self, templates: Vec<DecisionTemplate>) -> Self {
        self.decisions = templates;
        self
    }

    /// Uses reproducible ids derived from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Computes relative timestamps from `anchor` instead of the current time.
    pub fn with_anchor(mut self, anchor: OffsetDateTime) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Builds and validates the records without writing them.
    pub fn build_data(&self) -> Result<ScenarioResult, SeedError> {
        let start = Instant::now();
        let clock = self.anchor.map_or_else(Clock::now, Clock::fixed);
        let mut ids = IdGenerator::from_seed(self.seed);

        let projects =
            ProjectGenerator::with_templates(self.projects.clone()).generate(&mut ids, &clock)?;
        let members = MemberGenerator::with_templates(self.memberships.clone())
            .generate(&projects, &clock)?;
        let decisions = DecisionGenerator::with_templates(self.decisions.clone())
            .generate(&projects, &mut ids, &clock)?;

        validate_ledger(&projects, &members, &decisions)?;

        let metrics = self.track_metrics.then(|| ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0,
            project_count: projects.len(),
            member_count: members.len(),
            decision_count: decisions.len(),
        });

        Ok(ScenarioResult {
            projects,
            members,
            decisions,
            writes: WriteTally::default(),
            metrics,
        })
    }

    /// Builds the records and writes them through `seeder`.
    ///
    /// Writes go in dependency order: projects, then members, then decisions.
    /// Invalid data is rejected before the first write.
    pub async fn build<S: ItemStore>(
        &self,
        seeder: &Seeder<S>,
    ) -> Result<ScenarioResult, SeedError> {
        let mut result = self.build_data()?;
        let seed_start = Instant::now();

        info!("Seeding table: {}", seeder.table());

        result.writes += seeder.seed_projects(&result.projects).await?;
        result.writes += seeder.seed_members(&result.members).await?;
        result.writes += seeder.seed_decisions(&result.decisions).await?;

        if let Some(metrics) = result.metrics.as_mut() {
            metrics.seeding_time_ms = seed_start.elapsed().as_millis() as u64;
        }

        Ok(result)
    }
}

/// Builds the standard sample dataset with fresh ids and writes every record
/// to `table`, overwriting on key collisions.
pub async fn build_and_submit<S: ItemStore>(
    store: S,
    table: &str,
) -> Result<ScenarioResult, SeedError> {
    let seeder = Seeder::new(store, table);
    ScenarioBuilder::new().build(&seeder).await
}
