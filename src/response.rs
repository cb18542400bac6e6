//! Call outcomes.
//!
//! A TeamCity call has three possible results: a value, nothing (the server
//! answered `404`), or an [`Error`](crate::Error). The first two are modelled
//! by [`Outcome`], so every successful call is a `Result<Outcome<T>>` and
//! "not found" can never be mistaken for a failure.

use crate::{Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// The successful result of a call: either the decoded value or nothing.
///
/// # Examples
///
/// ```
/// use teamcity_rest::Outcome;
///
/// let found = Outcome::Found(42);
/// assert_eq!(found.map(|n| n + 1).into_option(), Some(43));
///
/// let absent: Outcome<i32> = Outcome::Absent;
/// assert!(absent.is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an absent outcome must be handled explicitly"]
pub enum Outcome<T> {
    /// The server returned a value.
    Found(T),
    /// The server reported that the resource does not exist.
    Absent,
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    /// Returns `true` for [`Outcome::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent)
    }

    /// Converts into an `Option`, dropping the distinction's name but not its meaning.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Absent => None,
        }
    }

    /// Borrows the contained value.
    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Found(value) => Outcome::Found(value),
            Outcome::Absent => Outcome::Absent,
        }
    }

    /// Maps the contained value, leaving absence untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::Absent => Outcome::Absent,
        }
    }

    /// Turns absence into the error produced by `err`.
    ///
    /// Create operations use this: a missing canonical object is a failure.
    pub fn found_or_else<F>(self, err: F) -> Result<T>
    where
        F: FnOnce() -> Error,
    {
        match self {
            Outcome::Found(value) => Ok(value),
            Outcome::Absent => Err(err()),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Returns the value, or `T::default()` when absent.
    ///
    /// List operations use this: a missing collection is an empty one.
    pub fn unwrap_or_default(self) -> T {
        match self {
            Outcome::Found(value) => value,
            Outcome::Absent => T::default(),
        }
    }
}

impl<T> From<Outcome<T>> for Option<T> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_option()
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Found(value),
            None => Outcome::Absent,
        }
    }
}

/// The undecoded answer of a single HTTP round trip.
///
/// The transport executor returns this for every status other than `404`
/// and textual `>= 400` responses, leaving interpretation to the codec
/// layer or the caller.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The raw body bytes.
    pub body: Bytes,
}

impl RawResponse {
    /// Returns `true` if the body contains nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Fails with [`Error::Protocol`] unless the status is below `400`.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            return Err(Error::Protocol {
                status: self.status,
                message: self.text(),
            });
        }
        Ok(self)
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &'static str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_absent_is_not_an_error() {
        let outcome: Outcome<u32> = Outcome::Absent;
        assert_eq!(outcome.clone().into_option(), None);
        assert_eq!(outcome.unwrap_or_default(), 0);
    }

    #[test]
    fn test_found_or_else_rejects_absence() {
        let created: Outcome<&str> = Outcome::Absent;
        let err = created.found_or_else(|| Error::NotCreated("project")).unwrap_err();
        assert!(matches!(err, Error::NotCreated("project")));

        let created = Outcome::Found("Proj1");
        assert_eq!(created.found_or_else(|| Error::NotCreated("project")).unwrap(), "Proj1");
    }

    #[test]
    fn test_whitespace_body_is_empty() {
        assert!(raw(204, "").is_empty());
        assert!(raw(200, " \n").is_empty());
        assert!(!raw(200, "{}").is_empty());
    }

    #[test]
    fn test_error_for_status() {
        assert!(raw(200, "ok").error_for_status().is_ok());
        let err = raw(500, "<html>boom</html>").error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "<html>boom</html>");
    }
}
