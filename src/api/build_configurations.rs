use crate::request::APPLICATION_JSON;
use crate::types::BuildConfiguration;
use crate::{Client, Outcome, Request, Result};
use http::Method;

impl Client {
    /// Gets a build configuration by id. A missing one is [`Outcome::Absent`].
    pub async fn build_configuration(&self, id: &str) -> Result<Outcome<BuildConfiguration>> {
        self.get_one(&self.build_type_path(id, "")).await
    }

    /// Creates a build configuration and returns the server's canonical copy.
    pub async fn create_build_configuration(
        &self,
        config: &BuildConfiguration,
    ) -> Result<BuildConfiguration> {
        self.create(&self.rest_path("buildTypes"), config, "build configuration")
            .await
    }

    /// Deletes a build configuration. Deleting a missing one succeeds.
    pub async fn delete_build_configuration(&self, id: &str) -> Result<()> {
        self.remove(&self.build_type_path(id, "")).await
    }

    /// Replaces a single field (`name`, `description`, `settings/<name>`, ...)
    /// with a plain-text value.
    pub async fn replace_build_configuration_field(
        &self,
        id: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        tracing::debug!(build_type = id, field = name, "Replacing build configuration field");
        let path = self.build_type_path(id, name);
        self.perform(Request::text(Method::PUT, path, value)).await
    }

    /// Sets the value of one build parameter.
    pub async fn replace_build_configuration_parameter(
        &self,
        id: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        let path = self.build_type_path(id, &format!("parameters/{name}"));
        self.perform(Request::text(Method::PUT, path, value)).await
    }

    /// Pauses or resumes a build configuration.
    pub async fn set_build_configuration_paused(&self, id: &str, paused: bool) -> Result<()> {
        let path = self.build_type_path(id, "paused");
        self.perform(Request::text(Method::PUT, path, paused.to_string()))
            .await
    }

    /// Attaches the template `template_id`, or detaches the current template
    /// when `None` (or empty).
    pub async fn set_build_configuration_template(
        &self,
        id: &str,
        template_id: Option<&str>,
    ) -> Result<()> {
        let path = self.build_type_path(id, "template");
        match template_id.filter(|t| !t.is_empty()) {
            Some(template_id) => {
                let request = Request::text(Method::PUT, path, format!("id:{template_id}"))
                    .accept(APPLICATION_JSON);
                self.perform(request).await
            }
            None => self.remove(&path).await,
        }
    }

    fn build_type_path(&self, id: &str, tail: &str) -> String {
        if tail.is_empty() {
            self.rest_path(&format!("buildTypes/id:{id}"))
        } else {
            self.rest_path(&format!("buildTypes/id:{id}/{tail}"))
        }
    }
}
