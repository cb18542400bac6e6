//! Resource types.
//!
//! Only the commonly used fields are modelled. Every type decodes leniently:
//! missing fields take their default and unknown fields are ignored.

mod agent;
mod build;
mod build_configuration;
mod project;
mod properties;
mod server;
mod vcs_root;

pub use agent::{Agent, AgentPool};
pub use build::{
    AgentRef, Build, BuildState, Change, ProblemOccurrence, QueueBuildRequest, Tag,
    TestOccurrence, TestOccurrenceQuery, Triggered, UserRef, BUILD_FIELDS,
};
pub use build_configuration::{BuildConfiguration, BuildTypeRef};
pub use project::{Project, ProjectLocator, ProjectSummary};
pub use properties::{Parameters, Properties, Property};
pub use server::Server;
pub use vcs_root::VcsRoot;
