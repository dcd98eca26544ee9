//! Configuration for seeding runs.

use serde::{Deserialize, Serialize};

use crate::db::WriteMode;

/// DynamoDB Local's default address.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_TABLE: &str = "decision-ledger";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Configuration for a seeding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Endpoint override for a local emulator. `None` targets AWS itself.
    pub endpoint: Option<String>,

    /// Table to write to. It must already exist.
    pub table_name: String,

    pub region: String,

    /// Attempts per request, first try included, before a throttled or
    /// transient failure is given up on.
    pub max_attempts: u32,

    /// Seed for reproducible ids. When set, writes only create missing items.
    pub seed: Option<u64>,

    /// Build and print the records without writing anything.
    pub dry_run: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            table_name: DEFAULT_TABLE.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
            dry_run: false,
        }
    }
}

impl SeedConfig {
    /// Seeded runs address the same items every time, so they must not
    /// overwrite. Unseeded runs always create new items.
    pub fn write_mode(&self) -> WriteMode {
        if self.seed.is_some() {
            WriteMode::IfAbsent
        } else {
            WriteMode::Overwrite
        }
    }
}
