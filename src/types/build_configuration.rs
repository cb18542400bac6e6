use serde::{Deserialize, Serialize};

use super::{Properties, ProjectLocator};

/// A build configuration (a "build type" on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfiguration {
    /// Server-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the owning project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Owning project reference, as sent in create payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectLocator>,
    /// Whether new builds are prevented from starting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Whether this configuration is itself a template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_flag: Option<bool>,
    /// The attached template, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<BuildTypeRef>,
    /// REST path of this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Link to the resource in the web UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// Parameters defined on this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Properties>,
    /// Build configuration settings (`settings/<name>`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Properties>,
}

impl BuildConfiguration {
    /// A build configuration to be created in project `project_id`.
    pub fn new(name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            project: Some(ProjectLocator::id(project_id)),
            ..Self::default()
        }
    }
}

/// The short build type form embedded in builds and agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildTypeRef {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of the owning project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Id of the owning project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// REST path of this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Link to the resource in the web UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}
