//! HTTP client, transport executor and JSON codec.
//!
//! The [`Client`] type is the main entry point. Requests pass through three
//! layers:
//!
//! 1. [`Client::execute`] performs exactly one HTTP round trip and classifies
//!    the answer: raw bytes, [`Outcome::Absent`] for `404`, or an error for
//!    textual `>= 400` responses.
//! 2. [`Client::json`], [`Client::text`] and [`Client::send`] are the decode
//!    strategies layered on top: JSON in and out, raw text, or no decoding.
//!    [`Client::json_success`] is the JSON strategy that rejects any status
//!    `>= 400` before decoding.
//! 3. [`Client::retrying`] wraps any of them in the configured
//!    [`RetryPolicy`].
//!
//! The resource operations in [`crate::api`] pick a strategy per endpoint.

use crate::{
    config::{ClientConfig, Credentials},
    request::{Request, APPLICATION_JSON, TEXT_PLAIN},
    retry::{RetryPolicy, RetryPredicate},
    CancellationToken, Error, Outcome, RawResponse, Result,
};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A TeamCity REST client.
///
/// Cloning is cheap: clones share the connection pool and configuration.
///
/// # Examples
///
/// ```no_run
/// use teamcity_rest::{Client, Outcome};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), teamcity_rest::Error> {
/// let client = Client::builder()
///     .host("teamcity.example.com")
///     .credentials("admin", "secret")
///     .max_attempts(3)
///     .timeout(Duration::from_secs(5))
///     .build()?;
///
/// for project in client.projects().await? {
///     println!("{:?}", project.id);
/// }
///
/// if let Outcome::Found(build) = client.build("1234").await? {
///     println!("build {} is {:?}", build.id, build.computed_state());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    cancel: CancellationToken,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: ClientConfig,
    base_url: String,
    rest_root: String,
    retry: RetryPolicy,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The retry policy wrapped around resource operations.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry
    }

    /// Returns a handle sharing this client's pool whose calls observe `token`.
    ///
    /// Cancelling the token aborts any retried operation in progress on the
    /// returned handle with [`Error::Cancelled`].
    pub fn with_cancellation(&self, token: CancellationToken) -> Client {
        Client {
            inner: Arc::clone(&self.inner),
            cancel: token,
        }
    }

    /// The token observed by calls made through this handle.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Joins `tail` onto the REST root, e.g. `projects/id:X` becomes
    /// `/app/rest/latest/projects/id:X`.
    pub fn rest_path(&self, tail: &str) -> String {
        format!("{}/{}", self.inner.rest_root, tail.trim_start_matches('/'))
    }

    /// Performs exactly one HTTP round trip.
    ///
    /// - `404` yields [`Outcome::Absent`] with no error.
    /// - `>= 400` with a `text/plain` body yields [`Error::Protocol`] carrying
    ///   the body text verbatim.
    /// - Anything else yields the raw response, whatever its status.
    ///
    /// Network failures become [`Error::Transport`], flagged transient for
    /// connect failures and timeouts.
    pub async fn execute(&self, request: &Request) -> Result<Outcome<RawResponse>> {
        let url = Url::parse(&format!("{}{}", self.inner.base_url, request.path))?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            "Executing HTTP request"
        );

        let Credentials { username, password } = &self.inner.config.credentials;
        let mut builder = self
            .inner
            .http_client
            .request(request.method.clone(), url)
            .basic_auth(username, Some(password))
            .header(ACCEPT, request.accept);

        if let Some(body) = &request.body {
            tracing::trace!(
                content_type = request.content_type,
                body = %String::from_utf8_lossy(body),
                "Request body"
            );
            builder = builder
                .header(CONTENT_TYPE, request.content_type)
                .body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();

        tracing::info!(
            status = status.as_u16(),
            method = %request.method,
            path = %request.path,
            "Received HTTP response"
        );

        if status == StatusCode::NOT_FOUND {
            return Ok(Outcome::Absent);
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if status.as_u16() >= 400 && is_text_plain(&headers) {
            let message = String::from_utf8_lossy(&body).into_owned();
            tracing::warn!(
                status = status.as_u16(),
                response = %message,
                "Server rejected request"
            );
            return Err(Error::Protocol { status, message });
        }

        Ok(Outcome::Found(RawResponse {
            status,
            headers,
            body,
        }))
    }

    /// Performs one JSON request/response cycle.
    ///
    /// The payload, if any, is serialized before anything is sent. An absent
    /// or empty response yields [`Outcome::Absent`]; otherwise the body is
    /// decoded into `Res`, whatever the status.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teamcity_rest::Client;
    /// use http::Method;
    ///
    /// # async fn example(client: &Client) -> Result<(), teamcity_rest::Error> {
    /// let path = client.rest_path("server");
    /// let server = client
    ///     .json::<(), serde_json::Value>(Method::GET, &path, None)
    ///     .await?;
    /// println!("{server:?}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn json<Req, Res>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Req>,
    ) -> Result<Outcome<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.exchange_json(method, path, payload, false).await
    }

    /// Like [`Client::json`], but any status `>= 400` becomes
    /// [`Error::Protocol`] before the body is decoded.
    ///
    /// Wire types decode leniently, so an error body would otherwise pass
    /// for a default-filled value.
    pub async fn json_success<Req, Res>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Req>,
    ) -> Result<Outcome<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.exchange_json(method, path, payload, true).await
    }

    async fn exchange_json<Req, Res>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Req>,
        require_success: bool,
    ) -> Result<Outcome<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let mut request = Request::new(method, path);
        if let Some(payload) = payload {
            let body =
                serde_json::to_vec(payload).map_err(|e| Error::Serialization(e.to_string()))?;
            request = request.body(APPLICATION_JSON, body);
        }

        let raw = match self.execute(&request).await? {
            Outcome::Found(raw) => raw,
            Outcome::Absent => return Ok(Outcome::Absent),
        };
        let raw = if require_success {
            raw.error_for_status()?
        } else {
            raw
        };
        if raw.is_empty() {
            return Ok(Outcome::Absent);
        }

        match serde_json::from_slice::<Res>(&raw.body) {
            Ok(value) => Ok(Outcome::Found(value)),
            Err(e) => {
                let err = Error::decode(raw.status, &e, &raw.text());
                tracing::error!(
                    error = %e,
                    status = raw.status.as_u16(),
                    path = %path,
                    "Failed to decode response"
                );
                Err(err)
            }
        }
    }

    /// Performs one request and returns the body as text.
    ///
    /// Any status `>= 400` becomes [`Error::Protocol`].
    pub async fn text(&self, request: &Request) -> Result<Outcome<String>> {
        match self.execute(request).await? {
            Outcome::Found(raw) => Ok(Outcome::Found(raw.error_for_status()?.text())),
            Outcome::Absent => Ok(Outcome::Absent),
        }
    }

    /// Performs one request and discards the body.
    ///
    /// Any status `>= 400` becomes [`Error::Protocol`].
    pub async fn send(&self, request: &Request) -> Result<Outcome<()>> {
        match self.execute(request).await? {
            Outcome::Found(raw) => raw.error_for_status().map(|_| Outcome::Found(())),
            Outcome::Absent => Ok(Outcome::Absent),
        }
    }

    /// Runs `op` under this client's retry policy and cancellation token.
    pub async fn retrying<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.inner.retry.run_cancellable(op, &self.cancel).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

fn is_text_plain(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(TEXT_PLAIN))
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use teamcity_rest::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), teamcity_rest::Error> {
/// let client = ClientBuilder::new()
///     .host("http://localhost:8111")
///     .credentials("admin", "secret")
///     .api_version("2018.1")
///     .deadline(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    host: Option<String>,
    credentials: Credentials,
    api_version: String,
    max_attempts: u32,
    timeout: Duration,
    deadline: Option<Duration>,
    retry_predicate: Option<Arc<dyn RetryPredicate>>,
    cancel: Option<CancellationToken>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        let defaults = ClientConfig::new(String::new(), Credentials::default());
        Self {
            host: None,
            credentials: defaults.credentials,
            api_version: defaults.api_version,
            max_attempts: defaults.max_attempts,
            timeout: defaults.timeout,
            deadline: defaults.deadline,
            retry_predicate: None,
            cancel: None,
        }
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            host: Some(config.host),
            credentials: config.credentials,
            api_version: config.api_version,
            max_attempts: config.max_attempts,
            timeout: config.timeout,
            deadline: config.deadline,
            retry_predicate: None,
            cancel: None,
        }
    }

    /// Starts from [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self> {
        ClientConfig::from_env().map(Self::from_config)
    }

    /// Sets the server host, with or without scheme.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the basic authentication credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    /// Sets the API version segment. An empty string omits it.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the attempt budget for transient failures.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the timeout of each individual attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bounds all attempts of one call together.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the predicate deciding which errors are retried.
    ///
    /// By default, requests are retried based on [`Error::is_transient`].
    pub fn retry_predicate(mut self, predicate: Arc<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Binds the client to a cancellation token.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no host was provided, the host does not form a
    /// valid URL, or the HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let host = self
            .host
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| Error::Configuration("host is required".to_string()))?;

        let config = ClientConfig {
            host,
            credentials: self.credentials,
            api_version: self.api_version,
            max_attempts: self.max_attempts,
            timeout: self.timeout,
            deadline: self.deadline,
        };

        let base_url = config.base_url();
        Url::parse(&base_url)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("teamcity-rest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        let mut retry = RetryPolicy::new(config.max_attempts).with_deadline(config.deadline);
        if let Some(predicate) = self.retry_predicate {
            retry = retry.with_predicate(predicate);
        }

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                rest_root: config.rest_root(),
                base_url,
                config,
                retry,
            }),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
