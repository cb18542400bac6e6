use serde::{Deserialize, Serialize};

use super::{BuildTypeRef, Properties};
use crate::{Envelope, EnvelopeItem};

/// Sub-objects requested for every build.
pub const BUILD_FIELDS: &str = "*,tags(tag),triggered(*),properties(property),problemOccurrences(*,problemOccurrence(*)),testOccurrences(*,testOccurrence(*)),changes(*,change(*))";

/// A queued, running or finished build.
///
/// Timestamps are kept in TeamCity's own `yyyyMMdd'T'HHmmssZ` form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Build {
    /// Build id.
    pub id: i64,
    /// Id of the build configuration.
    pub build_type_id: Option<String>,
    /// Short form of the build configuration.
    pub build_type: Option<BuildTypeRef>,
    /// Who or what triggered the build.
    pub triggered: Option<Triggered>,
    /// Changes included in the build.
    pub changes: Option<Envelope<Change>>,
    /// When the build entered the queue.
    pub queued_date: Option<String>,
    /// Position in the queue while queued.
    pub queue_position: Option<i64>,
    /// When the build started.
    pub start_date: Option<String>,
    /// When the build finished.
    pub finish_date: Option<String>,
    /// Build number as shown in the UI.
    pub number: Option<String>,
    /// `SUCCESS`, `FAILURE` or `UNKNOWN`.
    pub status: Option<String>,
    /// Human-readable status summary.
    pub status_text: Option<String>,
    /// Server state: `queued`, `running` or `finished`.
    pub state: Option<String>,
    /// Branch the build ran on.
    pub branch_name: Option<String>,
    /// Whether this is a personal build.
    pub personal: bool,
    /// Whether the build is running.
    pub running: bool,
    /// Whether the build is pinned.
    pub pinned: bool,
    /// Whether the build ran on the default branch.
    pub default_branch: bool,
    /// REST path of this resource.
    pub href: Option<String>,
    /// Link to the resource in the web UI.
    pub web_url: Option<String>,
    /// Agent the build ran on.
    pub agent: Option<AgentRef>,
    /// Build problems.
    pub problem_occurrences: Option<Envelope<ProblemOccurrence>>,
    /// Test results.
    pub test_occurrences: Option<Envelope<TestOccurrence>>,
    /// Tags attached to the build.
    pub tags: Option<Envelope<Tag>>,
    /// Parameters the build was started with.
    pub properties: Option<Properties>,
}

/// Where a build is in its lifecycle, derived from its timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// No queued date: the build has not been seen by the queue.
    Unknown,
    /// Queued but not started.
    Queued,
    /// Started but not finished.
    Started,
    /// Finished, successfully or not.
    Finished,
}

fn is_set(date: &Option<String>) -> bool {
    date.as_deref().is_some_and(|d| !d.is_empty())
}

impl Build {
    /// Lifecycle state derived from which of the queued, start and finish
    /// dates are set.
    ///
    /// ```
    /// use teamcity_rest::types::{Build, BuildState};
    ///
    /// let mut build = Build::default();
    /// build.queued_date = Some("20200119T190211+0000".to_string());
    /// assert_eq!(build.computed_state(), BuildState::Queued);
    /// ```
    pub fn computed_state(&self) -> BuildState {
        if !is_set(&self.queued_date) {
            BuildState::Unknown
        } else if !is_set(&self.start_date) {
            BuildState::Queued
        } else if !is_set(&self.finish_date) {
            BuildState::Started
        } else {
            BuildState::Finished
        }
    }

    /// Tag names, in server order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .flat_map(|tags| tags.items.iter())
            .map(|tag| tag.name.as_str())
            .collect()
    }
}

impl EnvelopeItem for Build {
    const KEY: &'static str = "build";
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Build {}, {:?} state={}",
            self.id,
            self.computed_state(),
            self.state.as_deref().unwrap_or("")
        )
    }
}

/// How a build was triggered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Triggered {
    /// Trigger type, e.g. `user` or `vcs`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// When the build was triggered.
    pub date: Option<String>,
    /// The triggering user, for manual builds.
    pub user: Option<UserRef>,
}

/// A short user reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserRef {
    /// User id.
    pub id: Option<i64>,
    /// Login name.
    pub username: Option<String>,
    /// Full name.
    pub name: Option<String>,
}

/// A short agent reference embedded in builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentRef {
    /// Agent id.
    pub id: Option<i64>,
    /// Agent name.
    pub name: Option<String>,
    /// Agent type id.
    pub type_id: Option<i64>,
    /// REST path of this resource.
    pub href: Option<String>,
}

/// A VCS change included in a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Change {
    /// Change id.
    pub id: i64,
    /// VCS revision.
    pub version: Option<String>,
    /// VCS user who made the change.
    pub username: Option<String>,
    /// When the change was committed.
    pub date: Option<String>,
    /// Commit message.
    pub comment: Option<String>,
    /// REST path of this resource.
    pub href: Option<String>,
    /// Link to the resource in the web UI.
    pub web_url: Option<String>,
}

impl EnvelopeItem for Change {
    const KEY: &'static str = "change";
}

/// A build problem, such as a non-zero exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemOccurrence {
    /// Server-assigned identifier.
    pub id: Option<String>,
    /// Problem type, e.g. `TC_EXIT_CODE`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Stable identity of the problem across builds.
    pub identity: Option<String>,
    /// Problem details.
    pub details: Option<String>,
    /// Whether the problem was muted in this build.
    pub muted: Option<bool>,
    /// Whether the problem is muted now.
    pub currently_muted: Option<bool>,
    /// REST path of this resource.
    pub href: Option<String>,
}

impl EnvelopeItem for ProblemOccurrence {
    const KEY: &'static str = "problemOccurrence";
}

/// One test result of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestOccurrence {
    /// Server-assigned identifier.
    pub id: Option<String>,
    /// Test name.
    pub name: Option<String>,
    /// `SUCCESS`, `FAILURE` or `UNKNOWN`.
    pub status: Option<String>,
    /// Duration in milliseconds.
    pub duration: Option<u64>,
    /// Failure details.
    pub details: Option<String>,
    /// Whether the test was ignored.
    pub ignored: Option<bool>,
    /// Whether the failure was muted in this build.
    pub muted: Option<bool>,
    /// Whether the test is muted now.
    pub currently_muted: Option<bool>,
    /// REST path of this resource.
    pub href: Option<String>,
}

impl EnvelopeItem for TestOccurrence {
    const KEY: &'static str = "testOccurrence";
}

/// A build tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Tag text.
    pub name: String,
}

impl EnvelopeItem for Tag {
    const KEY: &'static str = "tag";
}

/// Payload of a queue-build request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueBuildRequest {
    /// Configuration to build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_type_id: Option<String>,
    /// Parameters for this build.
    pub properties: Properties,
    /// Full branch ref, e.g. `refs/heads/main`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

impl QueueBuildRequest {
    /// `branch` is a short name; it is sent as `refs/heads/<branch>`.
    pub fn new(build_type_id: &str, branch: Option<&str>, properties: Properties) -> Self {
        Self {
            build_type_id: Some(build_type_id).filter(|id| !id.is_empty()).map(str::to_string),
            properties,
            branch_name: branch
                .filter(|b| !b.is_empty())
                .map(|b| format!("refs/heads/{b}")),
        }
    }
}

/// Which test occurrences to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOccurrenceQuery {
    /// Maximum number of occurrences returned.
    pub count: u64,
    /// Only failed tests.
    pub failing_only: bool,
    /// Skip currently muted tests.
    pub ignore_muted: bool,
}

impl Default for TestOccurrenceQuery {
    fn default() -> Self {
        Self {
            count: 100,
            failing_only: false,
            ignore_muted: false,
        }
    }
}
