//! Fluent builder APIs for seeding scenarios.
//!
//! The [`ScenarioBuilder`] assembles the sample projects, memberships and
//! decisions, checks them, and writes them through a [`Seeder`](crate::db::Seeder).

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult, build_and_submit};
