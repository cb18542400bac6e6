use serde::Deserialize;

/// Server version and identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    /// Full version string, e.g. `2023.11 (build 147412)`.
    pub version: String,
    /// Major version, e.g. `2023`.
    pub version_major: Option<u32>,
    /// Minor version, e.g. `11`.
    pub version_minor: Option<u32>,
    /// Server build number.
    pub build_number: Option<String>,
    /// Date the server was built.
    pub build_date: Option<String>,
    /// When the server was started.
    pub start_time: Option<String>,
    /// Server clock at the time of the call.
    pub current_time: Option<String>,
    /// Unique id of this server installation.
    pub internal_id: Option<String>,
    /// Link to the resource in the web UI.
    pub web_url: Option<String>,
}
