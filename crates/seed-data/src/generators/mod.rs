//! Entity generators for the sample dataset.
//!
//! - [`IdGenerator`]: random or seeded UUIDs
//! - [`ProjectGenerator`]: projects with their notification channels
//! - [`MemberGenerator`]: project memberships
//! - [`DecisionGenerator`]: decisions and the supersession link between them

pub mod decision;
pub mod ids;
pub mod member;
pub mod project;

pub use decision::{DecisionGenerator, DecisionTemplate, SAMPLE_DECISIONS};
pub use ids::{IdGenerator, generate_identifier};
pub use member::{MemberGenerator, MembershipTemplate, SAMPLE_MEMBERSHIPS};
pub use project::{ProjectGenerator, ProjectTemplate, SAMPLE_PROJECTS};
