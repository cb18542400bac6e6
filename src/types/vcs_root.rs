use serde::{Deserialize, Serialize};

use super::{Properties, ProjectLocator};

/// A VCS root: repository settings shared by build configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VcsRoot {
    /// Server-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The VCS plugin, e.g. `jetbrains.git`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcs_name: Option<String>,
    /// Owning project reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectLocator>,
    /// Seconds between checks for new changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_check_interval: Option<u32>,
    /// REST path of this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// VCS plugin settings, such as `url` and `branch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl VcsRoot {
    /// A VCS root to be created in project `project_id`, using the VCS
    /// plugin `vcs_name` (e.g. `jetbrains.git`).
    pub fn new(
        name: impl Into<String>,
        vcs_name: impl Into<String>,
        project_id: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self {
            name: Some(name.into()),
            vcs_name: Some(vcs_name.into()),
            project: Some(ProjectLocator::id(project_id)),
            properties: Some(properties),
            ..Self::default()
        }
    }
}
