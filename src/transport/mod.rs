//! ### Sending Messages
//!
//! This section explains how to send emails you have composed.
//!
//! To be sendable, messages have to implement [`EmailMessage`]: they expose an
//! envelope and stream their raw form. Every transport compiles the message,
//! submits it, and reports a single outcome.
//!
//! The following transports are available:
//!
//! * The `SesTransport` submits the raw message through a provider's "send raw
//!   email" API, using a client you inject. It is the transport to use in
//!   production.
//! * The `StubTransport` is useful for debugging, and only logs the envelope of
//!   the email.
//!
//! Transports never retry. Nothing here enforces a timeout either: wrap the
//! send future in your runtime's timeout if you need bounded latency.

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;

use crate::address::Envelope;
use crate::message::{CompileError, EmailMessage, MessageCompiler, StreamOptions};

#[cfg(feature = "ses-transport")]
pub mod ses;
pub mod stub;

/// Async transport method for emails
#[async_trait]
pub trait Transport {
    /// Result types for the transport
    type Ok: fmt::Debug;
    type Error: StdError + From<CompileError>;

    /// Options used when compiling messages for this transport
    fn stream_options(&self) -> StreamOptions {
        StreamOptions::new()
    }

    /// Sends the email
    ///
    /// The message is compiled first. If compilation fails nothing is
    /// submitted.
    async fn send<M>(&self, message: &M) -> Result<Self::Ok, Self::Error>
    where
        M: EmailMessage + Sync + ?Sized,
    {
        let raw = MessageCompiler::new()
            .compile(message, self.stream_options())
            .await?;
        self.send_raw(message.envelope(), raw.as_bytes()).await
    }

    /// Sends the email, reporting the outcome to `on_complete`
    ///
    /// `on_complete` runs exactly once, with either the success value or the
    /// error.
    async fn send_mail<M, F>(&self, message: &M, on_complete: F)
    where
        M: EmailMessage + Sync + ?Sized,
        F: FnOnce(Result<Self::Ok, Self::Error>) + Send,
    {
        let result = self.send(message).await;
        on_complete(result);
    }

    async fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error>;
}

/// Successful submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Response {
    message_id: Option<String>,
}

impl Response {
    /// Creates a response, with the identifier assigned by the provider if any
    pub fn new(message_id: Option<String>) -> Self {
        Response { message_id }
    }

    /// Identifier the provider assigned to the accepted message
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }
}
