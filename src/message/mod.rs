//! Messages handed to transports
//!
//! A message is anything that knows its [`Envelope`] and can stream its own raw
//! form (headers and body) as a sequence of byte chunks. Composition happens
//! elsewhere: transports only drain the stream through [`MessageCompiler`].
//!
//! [`PreparedMessage`] covers the common case of a message whose header block
//! and body are already serialized.

use std::io;

use futures_util::stream::BoxStream;

use crate::address::Envelope;

pub use self::compiler::{CompileError, CompiledEmail, MessageCompiler};
pub use self::prepared::PreparedMessage;

mod compiler;
mod prepared;

/// Raw message stream
///
/// Yields chunks in message order, ends the stream on end-of-message and
/// yields an `Err` if the message can not be produced.
pub type MessageStream<'a> = BoxStream<'a, io::Result<Vec<u8>>>;

/// Options a transport passes when asking a message for its raw form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamOptions {
    keep_bcc: bool,
}

impl StreamOptions {
    /// Options producing the message as it would be delivered to recipients
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the `Bcc` header in the raw message
    ///
    /// Needed by providers which build delivery from the raw message and strip
    /// the header themselves in transit.
    pub fn keep_bcc(mut self, keep_bcc: bool) -> Self {
        self.keep_bcc = keep_bcc;
        self
    }

    /// Whether the `Bcc` header must be kept
    pub fn keeps_bcc(&self) -> bool {
        self.keep_bcc
    }
}

/// An already composed email
pub trait EmailMessage {
    /// Addressing used for submission
    fn envelope(&self) -> &Envelope;

    /// Streams the raw message
    ///
    /// Each call starts a new stream from the beginning of the message.
    fn stream(&self, options: StreamOptions) -> MessageStream<'_>;
}

impl<M> EmailMessage for &M
where
    M: EmailMessage + ?Sized,
{
    fn envelope(&self) -> &Envelope {
        (**self).envelope()
    }

    fn stream(&self, options: StreamOptions) -> MessageStream<'_> {
        (**self).stream(options)
    }
}
