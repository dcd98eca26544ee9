//! Writing generated records to a table.

use ledger::{Decision, LedgerError, Project, ProjectMember};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::codec::ToItem;
use super::store::{ItemStore, PutOutcome, StoreError, WriteMode};

/// Longest decision summary printed in progress output.
const SUMMARY_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid seed data: {0}")]
    Ledger(#[from] LedgerError),
}

/// Number of puts that wrote an item and that found one already there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteTally {
    pub written: usize,
    pub skipped: usize,
}

impl WriteTally {
    fn record(&mut self, outcome: PutOutcome) {
        match outcome {
            PutOutcome::Written => self.written += 1,
            PutOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped
    }
}

impl std::ops::AddAssign for WriteTally {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

/// Writes ledger records to one table, one put per record.
///
/// Every put is awaited before the next starts. The first failure is returned
/// immediately; records already written stay written.
pub struct Seeder<S> {
    store: S,
    table: String,
    write_mode: WriteMode,
}

impl<S: ItemStore> Seeder<S> {
    /// Creates a seeder that overwrites items in `table`.
    pub fn new(store: S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            write_mode: WriteMode::Overwrite,
        }
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seeds projects.
    pub async fn seed_projects(&self, projects: &[Project]) -> Result<WriteTally, SeedError> {
        let mut tally = WriteTally::default();
        for project in projects {
            let outcome = self.put(project, &project.pk()).await?;
            if outcome == PutOutcome::Written {
                info!("  Created project: {}", project.name);
            }
            tally.record(outcome);
        }
        Ok(tally)
    }

    /// Seeds project memberships.
    pub async fn seed_members(&self, members: &[ProjectMember]) -> Result<WriteTally, SeedError> {
        let mut tally = WriteTally::default();
        for member in members {
            let key = format!("{} {}", member.pk(), member.sk());
            tally.record(self.put(member, &key).await?);
        }
        info!("  Created {} project members", tally.written);
        Ok(tally)
    }

    /// Seeds decisions.
    pub async fn seed_decisions(&self, decisions: &[Decision]) -> Result<WriteTally, SeedError> {
        let mut tally = WriteTally::default();
        for decision in decisions {
            let outcome = self.put(decision, &decision.pk()).await?;
            if outcome == PutOutcome::Written {
                info!("  Created decision: {}...", preview(&decision.summary));
            }
            tally.record(outcome);
        }
        Ok(tally)
    }

    /// Encodes and writes a single record.
    async fn put<T: ToItem>(&self, record: &T, key: &str) -> Result<PutOutcome, SeedError> {
        debug!("PutItem {} into {}", key, self.table);
        let outcome = self
            .store
            .put_item(&self.table, record.to_item(), self.write_mode)
            .await?;
        if outcome == PutOutcome::Skipped {
            warn!("  Skipped {}: item already exists", key);
        }
        Ok(outcome)
    }
}

fn preview(summary: &str) -> String {
    summary.chars().take(SUMMARY_PREVIEW_CHARS).collect()
}
