//! Error types for TeamCity REST calls.
//!
//! Every failure is classified at the point where it happens. Transport
//! failures carry an explicit `transient` flag decided by the transport
//! executor, so the retry policy never has to guess whether an error is
//! safe to repeat. A `404` is not represented here at all: it surfaces as
//! [`Outcome::Absent`](crate::Outcome::Absent).

use http::StatusCode;
use std::time::Duration;

/// Maximum number of characters of a response body kept in a [`Error::Decode`].
pub const DECODE_EXCERPT_CHARS: usize = 1000;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for TeamCity REST calls.
///
/// # Examples
///
/// ```no_run
/// use teamcity_rest::{Client, Error, Outcome};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .host("teamcity.example.com")
///     .credentials("admin", "secret")
///     .build()?;
///
/// match client.project("MyProject").await {
///     Ok(Outcome::Found(project)) => println!("found {:?}", project.name),
///     Ok(Outcome::Absent) => println!("no such project"),
///     Err(Error::Protocol { status, message }) => eprintln!("{status}: {message}"),
///     Err(e) if e.is_transient() => eprintln!("server unreachable: {e}"),
///     Err(e) => eprintln!("call failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response (DNS, connect, timeout, I/O).
    ///
    /// `transient` is set by the transport executor: connect failures and
    /// timeouts are transient, everything else is permanent.
    #[error("transport error: {source}")]
    Transport {
        /// Whether repeating the request may succeed.
        transient: bool,
        /// The underlying networking error.
        #[source]
        source: BoxError,
    },

    /// The server answered with an error status and a textual body.
    ///
    /// The display form is exactly the server's text.
    #[error("{message}")]
    Protocol {
        /// The HTTP status code.
        status: StatusCode,
        /// The verbatim response body.
        message: String,
    },

    /// The request payload could not be encoded. No request was sent.
    #[error("marshaling data: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected shape.
    #[error("json unmarshal (status {status}): {serde_error} ({body:?})")]
    Decode {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The serde error message.
        serde_error: String,
        /// At most the first [`DECODE_EXCERPT_CHARS`] characters of the body.
        body: String,
    },

    /// A create call returned no canonical object.
    #[error("{0} not created")]
    NotCreated(&'static str),

    /// A replace-all call returned no canonical object.
    #[error("{0} not updated")]
    NotUpdated(&'static str),

    /// The client was configured with invalid values.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The host or path did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The call was aborted through its cancellation token.
    #[error("call cancelled")]
    Cancelled,

    /// The retried operation did not finish within the configured deadline.
    #[error("deadline of {deadline:?} exceeded")]
    DeadlineExceeded {
        /// The configured deadline spanning all attempts.
        deadline: Duration,
    },
}

impl Error {
    /// Builds a transport error with an explicit transient flag.
    pub fn transport<E>(source: E, transient: bool) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Transport {
            transient,
            source: source.into(),
        }
    }

    /// Builds a decode error, truncating the body to [`DECODE_EXCERPT_CHARS`].
    pub fn decode(status: StatusCode, serde_error: impl ToString, body: &str) -> Self {
        Error::Decode {
            status,
            serde_error: serde_error.to_string(),
            body: truncate(body, DECODE_EXCERPT_CHARS).to_string(),
        }
    }

    /// Returns `true` if this error may go away when the call is repeated.
    ///
    /// Only transport errors can be transient. HTTP-level failures, codec
    /// failures, cancellation and deadlines never are.
    ///
    /// ```
    /// use teamcity_rest::Error;
    /// use http::StatusCode;
    ///
    /// let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
    /// assert!(Error::transport(refused, true).is_transient());
    ///
    /// let rejected = Error::Protocol {
    ///     status: StatusCode::BAD_REQUEST,
    ///     message: "invalid value".to_string(),
    /// };
    /// assert!(!rejected.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport { transient: true, .. })
    }

    /// Returns the HTTP status code if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Protocol { status, .. } | Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the (possibly truncated) response body if the server answered.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Protocol { message, .. } => Some(message),
            Error::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let transient = e.is_timeout() || e.is_connect();
        Error::transport(e, transient)
    }
}

/// Returns at most the first `max_chars` characters of `s`.
pub(crate) fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// A specialized `Result` type for TeamCity REST calls.
pub type Result<T> = std::result::Result<T, Error>;
