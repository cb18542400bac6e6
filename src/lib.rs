//! # teamcity-rest - a typed TeamCity REST API client
//!
//! `teamcity-rest` wraps the TeamCity REST API in typed, `async` operations
//! built on top of `reqwest`. It takes care of URL construction, basic
//! authentication, content negotiation, retrying transient failures and
//! JSON encoding/decoding.
//!
//! ## Quick Start
//!
//! ```no_run
//! use teamcity_rest::{types::Project, Client, Outcome};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), teamcity_rest::Error> {
//!     let client = Client::builder()
//!         .host("teamcity.example.com")
//!         .credentials("admin", "secret")
//!         .max_attempts(5)
//!         .timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     // Lookups distinguish "not found" from failure.
//!     match client.project("Widgets").await? {
//!         Outcome::Found(project) => println!("exists: {:?}", project.web_url),
//!         Outcome::Absent => {
//!             let created = client.create_project(&Project::new("Widgets", "_Root")).await?;
//!             println!("created: {:?}", created.id);
//!         }
//!     }
//!
//!     client.set_build_configuration_paused("Widgets_Build", true).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Outcomes
//!
//! A call returns `Result<Outcome<T>>`: a value, [`Outcome::Absent`] when the
//! server answered `404`, or an [`Error`]. List operations fold absence into
//! an empty `Vec`; create operations turn it into [`Error::NotCreated`].
//!
//! ## Retries
//!
//! Operations run under a [`RetryPolicy`]: up to `max_attempts` attempts,
//! repeated immediately, but only for errors that report themselves as
//! transient (connect failures and timeouts). Server rejections fail fast:
//!
//! ```no_run
//! use teamcity_rest::{Client, Error};
//!
//! # async fn example(client: &Client) -> Result<(), Error> {
//! match client.replace_build_configuration_parameter("App_Build", "env.PORT", "x").await {
//!     Ok(()) => {}
//!     Err(Error::Protocol { status, message }) => eprintln!("rejected ({status}): {message}"),
//!     Err(e) if e.is_transient() => eprintln!("gave up on unreachable server: {e}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A deadline spanning all attempts can be configured with
//! [`ClientBuilder::deadline`], and a [`CancellationToken`] bound through
//! [`Client::with_cancellation`] aborts calls in progress.

pub mod api;
mod cancel;
mod client;
pub mod config;
mod envelope;
mod error;
pub mod request;
mod response;
pub mod retry;
pub mod types;

pub use cancel::CancellationToken;
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, Credentials};
pub use envelope::{Envelope, EnvelopeItem};
pub use error::{Error, Result};
pub use request::Request;
pub use response::{Outcome, RawResponse};
pub use retry::{RetryPolicy, RetryPredicate};
