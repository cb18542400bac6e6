use crate::types::{Properties, VcsRoot};
use crate::{Client, Outcome, Result};

impl Client {
    /// Gets a VCS root by id. A missing root is [`Outcome::Absent`].
    pub async fn vcs_root(&self, vcs_root_id: &str) -> Result<Outcome<VcsRoot>> {
        self.get_one(&self.rest_path(&format!("vcs-roots/id:{vcs_root_id}")))
            .await
    }

    /// Creates a VCS root and returns the server's canonical copy.
    pub async fn create_vcs_root(&self, vcs_root: &VcsRoot) -> Result<VcsRoot> {
        self.create(&self.rest_path("vcs-roots"), vcs_root, "VCS root")
            .await
    }

    /// Deletes a VCS root.
    pub async fn delete_vcs_root(&self, vcs_root_id: &str) -> Result<()> {
        self.remove(&self.rest_path(&format!("vcs-roots/id:{vcs_root_id}")))
            .await
    }

    /// Replaces every setting of a VCS root, returning the server's copy.
    pub async fn replace_vcs_root_properties(
        &self,
        vcs_root_id: &str,
        properties: &Properties,
    ) -> Result<Properties> {
        let path = self.rest_path(&format!("vcs-roots/id:{vcs_root_id}/properties"));
        self.replace(&path, properties, "VCS root properties")
            .await
    }
}
