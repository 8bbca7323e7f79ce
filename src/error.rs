//! Error type for email transports

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

use crate::address::AddressError;
use crate::message::CompileError;

/// Errors returned by a transport
///
/// Exactly one of these, or a success value, is produced per send.
#[derive(Debug)]
pub enum Error {
    /// The message stream failed before a complete raw message was read
    Compile(CompileError),
    /// The envelope can not be submitted
    Envelope(AddressError),
    /// Error reported by the provider client, passed through unmodified
    Provider(Box<dyn StdError + Send + Sync>),
    /// The provider call completed without an error and without a response
    MissingResponse,
    /// The provider response lacks the message identifier acknowledging the message
    MissingAcknowledgment,
}

impl Error {
    /// Returns the provider client error, if this is one
    pub fn provider(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Error::Provider(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Returns true if the message could not be compiled and nothing was submitted
    pub fn is_compile(&self) -> bool {
        matches!(self, Error::Compile(_))
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(err) => write!(fmt, "email failed: could not compile message: {}", err),
            Error::Envelope(err) => write!(fmt, "email failed: invalid envelope: {}", err),
            Error::Provider(err) => write!(fmt, "email failed: {}", err),
            Error::MissingResponse => {
                fmt.write_str("email failed: provider response missing, but no error returned")
            }
            Error::MissingAcknowledgment => fmt.write_str(
                "email failed: provider acknowledgment missing, no message id returned",
            ),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Compile(err) => Some(err),
            Error::Envelope(err) => Some(err),
            Error::Provider(err) => Some(err.as_ref()),
            Error::MissingResponse | Error::MissingAcknowledgment => None,
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Error {
        Error::Compile(err)
    }
}

impl From<AddressError> for Error {
    fn from(err: AddressError) -> Error {
        Error::Envelope(err)
    }
}
