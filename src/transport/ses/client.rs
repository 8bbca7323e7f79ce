//! Provider client contract and its payloads

use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;

use super::SesConfig;
use crate::address::{Address, Envelope};

/// A provider client able to submit a raw message
///
/// Implementations own the network side: endpoint resolution, request
/// signing, credentials and their own timeouts. The client is shared by every
/// send of a transport and may be called concurrently.
#[async_trait]
pub trait RawEmailClient {
    /// Error reported by the provider or the client
    type Error: StdError + Send + Sync + 'static;

    /// Submits a raw message
    ///
    /// `Ok(None)` means the call completed without an error and without a
    /// response.
    async fn send_raw_email(
        &self,
        request: SendRawEmailRequest,
    ) -> Result<Option<SendRawEmailResponse>, Self::Error>;
}

#[async_trait]
impl<C> RawEmailClient for Arc<C>
where
    C: RawEmailClient + Send + Sync + ?Sized,
{
    type Error = C::Error;

    async fn send_raw_email(
        &self,
        request: SendRawEmailRequest,
    ) -> Result<Option<SendRawEmailResponse>, Self::Error> {
        (**self).send_raw_email(request).await
    }
}

/// Clients which can be built from a [`SesConfig`]
pub trait ClientFromConfig: RawEmailClient + Sized {
    /// Builds the client
    fn from_config(config: &SesConfig) -> Result<Self, <Self as RawEmailClient>::Error>;
}

/// The "send raw email" request
///
/// With the `serde` feature, serializes as
/// `{"RawMessage":{"Data":"..."},"Source":"...","Destinations":["..."]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct SendRawEmailRequest {
    raw_message: RawMessage,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    source: Option<Address>,
    destinations: Vec<Address>,
}

impl SendRawEmailRequest {
    /// Builds the request for a compiled message
    ///
    /// Sender and recipients come from `envelope`, never from the headers of
    /// `email`. Without envelope sender, `Source` is left out and the provider
    /// reads the `From` header instead.
    pub fn new(envelope: &Envelope, email: &[u8]) -> Self {
        SendRawEmailRequest {
            raw_message: RawMessage {
                data: base64::encode(email),
            },
            source: envelope.from().cloned(),
            destinations: envelope.to().to_vec(),
        }
    }

    /// The raw message
    pub fn raw_message(&self) -> &RawMessage {
        &self.raw_message
    }

    /// Envelope sender
    pub fn source(&self) -> Option<&Address> {
        self.source.as_ref()
    }

    /// Envelope recipients, in envelope order
    pub fn destinations(&self) -> &[Address] {
        &self.destinations
    }
}

/// Raw message payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct RawMessage {
    data: String,
}

impl RawMessage {
    /// Base64 encoded message
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Decodes the message bytes
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::decode(&self.data)
    }
}

/// The "send raw email" response
///
/// With the `serde` feature, deserializes from `{"MessageId":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct SendRawEmailResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    message_id: Option<String>,
}

impl SendRawEmailResponse {
    /// Creates a response
    pub fn new(message_id: Option<String>) -> Self {
        SendRawEmailResponse { message_id }
    }

    /// Creates a response acknowledging the message under `message_id`
    pub fn with_message_id<S: Into<String>>(message_id: S) -> Self {
        Self::new(Some(message_id.into()))
    }

    /// Identifier assigned by the provider
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }
}
