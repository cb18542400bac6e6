use crate::request::TEXT_PLAIN;
use crate::types::{
    Build, Change, ProblemOccurrence, Properties, Property, QueueBuildRequest, TestOccurrence,
    TestOccurrenceQuery, BUILD_FIELDS,
};
use crate::{Client, Envelope, Outcome, Request, Result};
use http::Method;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelBuildRequest<'a> {
    comment: &'a str,
    read_into_queue: bool,
}

impl Client {
    /// Gets a build with its tags, trigger, properties, problems, tests and
    /// changes. A missing build is [`Outcome::Absent`].
    pub async fn build(&self, build_id: &str) -> Result<Outcome<Build>> {
        let path = self.rest_path(&format!("builds/id:{build_id}?fields={BUILD_FIELDS}"));
        self.get_one(&path).await
    }

    /// Lists recent builds with their details.
    pub async fn builds(&self) -> Result<Vec<Build>> {
        let path = self.rest_path(&format!("builds?fields=count,build({BUILD_FIELDS})"));
        self.get_list(&path).await
    }

    /// Finds builds matching a build locator such as `status:FAILURE,count:10`.
    pub async fn search_builds(&self, locator: &str) -> Result<Vec<Build>> {
        let path = self.rest_path(&format!(
            "builds/?locator={locator}&fields=count,build({BUILD_FIELDS})"
        ));
        self.get_list(&path).await
    }

    /// Lists queued builds.
    pub async fn build_queue(&self) -> Result<Vec<Build>> {
        let path = self.rest_path(&format!("buildQueue?fields=count,build({BUILD_FIELDS})"));
        self.get_list(&path).await
    }

    /// Queues a build of `build_type_id`, optionally on `branch`
    /// (sent as `refs/heads/<branch>`), and returns the queued build.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teamcity_rest::{types::Properties, Client};
    ///
    /// # async fn example(client: &Client) -> Result<(), teamcity_rest::Error> {
    /// let properties: Properties = [("env.DEPLOY", "true")].into_iter().collect();
    /// let queued = client.queue_build("App_Build", Some("main"), properties).await?;
    /// println!("queued build {}", queued.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn queue_build(
        &self,
        build_type_id: &str,
        branch: Option<&str>,
        properties: Properties,
    ) -> Result<Build> {
        let request = QueueBuildRequest::new(build_type_id, branch, properties);
        self.create(&self.rest_path("buildQueue"), &request, "build")
            .await
    }

    /// Looks up the id of build `number` of `build_type_id` on `branch`.
    pub async fn find_build_id(
        &self,
        build_type_id: &str,
        branch: &str,
        number: &str,
    ) -> Result<Outcome<i64>> {
        let path = self.rest_path(&format!(
            "buildTypes/id:{build_type_id}/builds?locator=branch:{branch},number:{number},count:1"
        ));
        let builds = self.get_one::<Envelope<Build>>(&path).await?;
        Ok(builds
            .into_option()
            .and_then(|builds| builds.items.into_iter().next())
            .map(|build| build.id)
            .into())
    }

    /// The properties a finished build resolved to.
    pub async fn build_properties(&self, build_id: &str) -> Result<Vec<Property>> {
        let path = self.rest_path(&format!("builds/id:{build_id}/resulting-properties"));
        self.get_list(&path).await
    }

    /// Changes behind a change-collection href, as found in
    /// [`Build::changes`].
    pub async fn changes(&self, href: &str) -> Result<Vec<Change>> {
        self.get_list(&format!("{href},count:99999")).await
    }

    /// Up to `count` problem occurrences behind `href`, with details.
    pub async fn problem_occurrences(
        &self,
        href: &str,
        count: u64,
    ) -> Result<Vec<ProblemOccurrence>> {
        let path = format!("{href},count:{count}&fields=*,problemOccurrence(*,details)");
        self.get_list(&path).await
    }

    /// Test occurrences behind `href`, filtered by `query`.
    pub async fn test_occurrences(
        &self,
        href: &str,
        query: &TestOccurrenceQuery,
    ) -> Result<Vec<TestOccurrence>> {
        let mut path = href.to_string();
        if query.ignore_muted {
            path.push_str(",currentlyMuted:false");
        }
        if query.failing_only {
            path.push_str(",status:FAILURE");
        }
        path.push_str(&format!(",count:{}", query.count));
        self.get_list(&path).await
    }

    /// Cancels a build and puts it back into the queue.
    pub async fn cancel_build(&self, build_id: i64, comment: &str) -> Result<Outcome<Build>> {
        let path = self.rest_path(&format!("builds/id:{build_id}"));
        let body = CancelBuildRequest {
            comment,
            read_into_queue: true,
        };
        let (path, body) = (&path, &body);
        self.retrying(move || self.json::<_, Build>(Method::POST, path, Some(body)))
            .await
    }

    /// Downloads the full build log as text.
    pub async fn build_log(&self, build_id: &str) -> Result<Outcome<String>> {
        let request = Request::new(
            Method::GET,
            format!("/httpAuth/downloadBuildLog.html?buildId={build_id}"),
        )
        .accept(TEXT_PLAIN);
        let request = &request;
        self.retrying(move || self.text(request)).await
    }
}
