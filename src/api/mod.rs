//! Resource operations.
//!
//! Every operation is one of a few shapes, each routed through the retry
//! policy:
//!
//! - **get**: a bare JSON object; `404` yields [`Outcome::Absent`].
//! - **list**: an [`Envelope`]; only the items are returned and `404`
//!   yields an empty `Vec`.
//! - **create**: returns the server's canonical object; a missing object is
//!   [`Error::NotCreated`] and any status `>= 400` is [`Error::Protocol`].
//! - **replace**: PUTs a JSON collection and returns the server's copy; a
//!   missing copy is [`Error::NotUpdated`] and any status `>= 400` is
//!   [`Error::Protocol`].
//! - **delete** and **text field** updates: no decoding, any status `>= 400`
//!   is an error, and `404` is success.

mod agents;
mod build_configurations;
mod builds;
mod projects;
mod server;
mod vcs_roots;

use crate::{Client, Envelope, EnvelopeItem, Error, Outcome, Request, Result};
use http::Method;
use serde::{de::DeserializeOwned, Serialize};

impl Client {
    pub(crate) async fn get_one<T>(&self, path: &str) -> Result<Outcome<T>>
    where
        T: DeserializeOwned,
    {
        self.retrying(move || self.json::<(), T>(Method::GET, path, None))
            .await
    }

    pub(crate) async fn get_list<T>(&self, path: &str) -> Result<Vec<T>>
    where
        T: EnvelopeItem,
    {
        let envelope = self.get_one::<Envelope<T>>(path).await?;
        Ok(envelope.unwrap_or_default().into_items())
    }

    pub(crate) async fn create<Req, Res>(
        &self,
        path: &str,
        payload: &Req,
        resource: &'static str,
    ) -> Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.retrying(move || self.json_success::<Req, Res>(Method::POST, path, Some(payload)))
            .await?
            .found_or_else(|| Error::NotCreated(resource))
    }

    pub(crate) async fn replace<T>(
        &self,
        path: &str,
        payload: &T,
        resource: &'static str,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.retrying(move || self.json_success::<T, T>(Method::PUT, path, Some(payload)))
            .await?
            .found_or_else(|| Error::NotUpdated(resource))
    }

    pub(crate) async fn perform(&self, request: Request) -> Result<()> {
        let request = &request;
        match self.retrying(move || self.send(request)).await? {
            Outcome::Found(()) => {}
            Outcome::Absent => {
                tracing::debug!(method = %request.method, path = %request.path, "Target absent");
            }
        }
        Ok(())
    }

    pub(crate) async fn remove(&self, path: &str) -> Result<()> {
        self.perform(Request::new(Method::DELETE, path)).await
    }
}
