use crate::types::{Parameters, Project, ProjectSummary};
use crate::{Client, Outcome, Request, Result};
use http::Method;

impl Client {
    /// Gets a project by id. A missing project is [`Outcome::Absent`].
    pub async fn project(&self, project_id: &str) -> Result<Outcome<Project>> {
        let path = self.rest_path(&format!("projects/id:{project_id}"));
        self.get_one(&path).await
    }

    /// Lists all projects in server order.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.get_list(&self.rest_path("projects")).await
    }

    /// Lists all projects in their short form.
    pub async fn project_summaries(&self) -> Result<Vec<ProjectSummary>> {
        self.get_list(&self.rest_path("projects")).await
    }

    /// Creates a project and returns the server's canonical copy, including
    /// the assigned id and href.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teamcity_rest::{types::Project, Client};
    ///
    /// # async fn example(client: &Client) -> Result<(), teamcity_rest::Error> {
    /// let created = client.create_project(&Project::new("Widgets", "_Root")).await?;
    /// println!("created {:?} at {:?}", created.id, created.href);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_project(&self, project: &Project) -> Result<Project> {
        self.create(&self.rest_path("projects"), project, "project")
            .await
    }

    /// Deletes a project and everything in it.
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.remove(&self.rest_path(&format!("projects/id:{project_id}")))
            .await
    }

    /// Sets a single project field (`name`, `description`, ...) as plain text.
    /// The field name is lowercased.
    pub async fn set_project_field(&self, project_id: &str, field: &str, value: &str) -> Result<()> {
        let path = self.rest_path(&format!(
            "projects/id:{project_id}/{}",
            field.to_lowercase()
        ));
        self.perform(Request::text(Method::PUT, path, value)).await
    }

    /// Replaces every parameter of a project, returning the server's copy.
    pub async fn replace_project_parameters(
        &self,
        project_id: &str,
        parameters: &Parameters,
    ) -> Result<Parameters> {
        let path = self.rest_path(&format!("projects/id:{project_id}/parameters"));
        self.replace(&path, parameters, "project").await
    }
}
