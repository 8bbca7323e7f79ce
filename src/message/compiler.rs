use std::{
    borrow::Cow,
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

use futures_util::stream::StreamExt;

use super::{EmailMessage, StreamOptions};

/// Drains a message stream into a single buffer
///
/// Chunks are concatenated in arrival order, without reordering or size
/// limit. The bytes are kept as produced, 8bit bodies in any charset
/// included. Provider size limits apply downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCompiler;

impl MessageCompiler {
    /// Creates a compiler
    pub fn new() -> Self {
        MessageCompiler
    }

    /// Compiles `message` to its raw form
    ///
    /// The returned future resolves once the message stream ends. A stream that
    /// never ends keeps it pending: put a deadline around the call if needed.
    pub async fn compile<M>(
        &self,
        message: &M,
        options: StreamOptions,
    ) -> Result<CompiledEmail, CompileError>
    where
        M: EmailMessage + ?Sized,
    {
        let mut stream = message.stream(options);
        let mut raw = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(CompileError::Stream)?;
            raw.extend_from_slice(&chunk);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = raw.len(), "message compiled");

        Ok(CompiledEmail(raw))
    }
}

/// A fully assembled raw message (headers and body)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledEmail(Vec<u8>);

impl CompiledEmail {
    /// The raw message bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The raw message as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// The raw message as text, invalid sequences replaced
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Length of the raw message in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the message stream produced nothing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the compiled email, returning the raw message
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CompiledEmail {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for CompiledEmail {
    fn from(raw: Vec<u8>) -> Self {
        CompiledEmail(raw)
    }
}

/// Message compilation error
#[derive(Debug)]
pub enum CompileError {
    /// The message stream reported an error before its end
    Stream(io::Error),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Stream(err) => write!(f, "message stream error: {}", err),
        }
    }
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CompileError::Stream(err) => Some(err),
        }
    }
}
