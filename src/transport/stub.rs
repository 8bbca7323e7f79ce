//! The stub transport only logs message envelope and drops the content. It can be useful for
//! testing purposes.
//!
//! ```rust
//! # use tokio1_crate as tokio;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sesmail::{Envelope, PreparedMessage, StubTransport, Transport};
//!
//! let email = PreparedMessage::new(Envelope::new(
//!     Some("nobody@domain.tld".parse()?),
//!     vec!["hei@domain.tld".parse()?],
//! )?)
//! .header("Subject", "Happy new year")
//! .body("Be happy!");
//!
//! let sender = StubTransport::new_ok();
//! let result = sender.send(&email).await;
//! assert!(result.is_ok());
//! # Ok(())
//! # }
//! ```
//!
//! Will log (when using a logger like `tracing-subscriber`):
//!
//! ```text
//! email from=<nobody@domain.tld> to=["hei@domain.tld"]
//! ```

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;

use super::{Response, Transport};
use crate::{address::Envelope, Error};

/// Error returned by a failing [`StubTransport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubError;

impl fmt::Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stub error")
    }
}

impl StdError for StubError {}

/// This transport logs the message envelope and returns the given response
#[derive(Debug, Clone)]
pub struct StubTransport {
    response: Result<Response, StubError>,
}

impl StubTransport {
    /// Creates a new transport that always returns the given response
    pub fn new(response: Result<Response, StubError>) -> StubTransport {
        StubTransport { response }
    }

    /// Creates a new transport that always returns a success response
    pub fn new_ok() -> StubTransport {
        StubTransport::new(Ok(Response::default()))
    }

    /// Creates a new transport that always accepts messages under `message_id`
    pub fn new_ok_with_id<S: Into<String>>(message_id: S) -> StubTransport {
        StubTransport::new(Ok(Response::new(Some(message_id.into()))))
    }

    /// Creates a new transport that always returns an error
    pub fn new_error() -> StubTransport {
        StubTransport::new(Err(StubError))
    }
}

#[async_trait]
impl Transport for StubTransport {
    type Ok = Response;
    type Error = Error;

    async fn send_raw(&self, envelope: &Envelope, _email: &[u8]) -> Result<Response, Error> {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "email from=<{}> to={:?}",
            envelope.from().map(|a| a.as_ref()).unwrap_or(""),
            envelope.to().iter().map(|a| a.as_ref()).collect::<Vec<&str>>()
        );
        #[cfg(not(feature = "tracing"))]
        let _ = envelope;

        self.response
            .clone()
            .map_err(|err| Error::Provider(Box::new(err)))
    }
}
