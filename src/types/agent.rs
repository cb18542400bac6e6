use serde::Deserialize;

use super::{Build, BuildTypeRef, ProjectSummary};
use crate::{Envelope, EnvelopeItem};

/// A build agent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Agent {
    /// Agent id.
    pub id: i64,
    /// Agent name.
    pub name: String,
    /// REST path of this resource.
    pub href: Option<String>,
    /// Link to the resource in the web UI.
    pub web_url: Option<String>,
    /// Whether the agent is connected to the server.
    pub connected: bool,
    /// Whether the agent may run builds.
    pub enabled: bool,
    /// Whether the agent is authorized.
    pub authorized: bool,
    /// Whether the agent runs the server's current agent version.
    #[serde(rename = "uptodate")]
    pub up_to_date: bool,
    /// The build currently running on the agent.
    #[serde(rename = "build")]
    pub active_build: Option<Build>,
    /// Configuration of the build currently running, if any.
    pub build_type: Option<BuildTypeRef>,
    /// The pool the agent belongs to.
    pub pool: Option<AgentPool>,
}

impl EnvelopeItem for Agent {
    const KEY: &'static str = "agent";
}

/// An agent pool and the projects assigned to it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentPool {
    /// Pool id.
    pub id: i64,
    /// Pool name.
    pub name: String,
    /// REST path of this resource.
    pub href: Option<String>,
    /// Maximum number of agents in the pool, if limited.
    pub max_agents: Option<i64>,
    /// Projects assigned to the pool.
    pub projects: Option<Envelope<ProjectSummary>>,
}
