//! Sesmail sends already-composed email messages through HTTP mail providers. It provides:
//!
//! * A pluggable async transport trait
//! * A provider-backed transport built around a "send raw message" operation
//! * A stub transport for testing
//! * Runtime-agnostic async, bring your own provider client
//!
//! Sesmail does not compose MIME messages and does not speak any provider's wire protocol:
//! messages implement [`EmailMessage`] and provider clients implement
//! [`RawEmailClient`](crate::transport::ses::RawEmailClient).
//!
//! ## Optional features
//!
//! * **ses-transport**: Transport over a provider's raw-message API
//! * **serde**: Serialization/Deserialization of configuration and provider payloads
//! * **tracing**: Logging using the `tracing` crate

#![doc(html_root_url = "https://docs.rs/sesmail/0.1.0")]
#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unsafe_code
)]

pub use crate::address::{Address, AddressError, Envelope};
pub use crate::error::Error;
pub use crate::message::{
    CompileError, CompiledEmail, EmailMessage, MessageCompiler, PreparedMessage, StreamOptions,
};
#[cfg(feature = "ses-transport")]
pub use crate::transport::ses::SesTransport;
pub use crate::transport::stub::StubTransport;
pub use crate::transport::Transport;

mod address;
mod error;
pub mod message;
pub mod transport;
