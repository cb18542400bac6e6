use serde::{Deserialize, Serialize};

use super::Properties;
use crate::EnvelopeItem;

/// A TeamCity project.
///
/// Fields the server assigns (`href`, `web_url`) are left out of create
/// payloads when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    /// Server-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the parent project, as returned by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_project_id: Option<String>,
    /// Parent project reference, as sent in create payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_project: Option<ProjectLocator>,
    /// Whether the project is archived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// REST path of this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Link to the resource in the web UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// Parameters defined on this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Properties>,
}

impl Project {
    /// A project to be created under `parent_id` (`_Root` for top level).
    pub fn new(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parent_project: Some(ProjectLocator::id(parent_id)),
            ..Self::default()
        }
    }
}

impl EnvelopeItem for Project {
    const KEY: &'static str = "project";
}

/// The short project form returned by listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Id of the parent project.
    pub parent_project_id: Option<String>,
    /// REST path of this resource.
    pub href: Option<String>,
}

impl EnvelopeItem for ProjectSummary {
    const KEY: &'static str = "project";
}

/// A reference to another project, as accepted by create payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLocator {
    /// Plain project id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Locator such as `id:Widgets`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl ProjectLocator {
    /// A reference by project id, sent as the locator `id:<id>`.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: None,
            locator: Some(format!("id:{}", id.into())),
        }
    }
}
