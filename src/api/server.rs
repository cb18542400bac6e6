use crate::types::Server;
use crate::{Client, Outcome, Result};

impl Client {
    /// Gets the server version and identity.
    pub async fn server(&self) -> Result<Outcome<Server>> {
        self.get_one(&self.rest_path("server")).await
    }
}
