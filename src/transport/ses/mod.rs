//! The provider transport submits already composed messages through a "send raw email" API
//! (Amazon SES `SendRawEmail` and compatible services).
//!
//! The transport does not talk to the network itself: it compiles the message, base64-encodes
//! it, and hands a [`SendRawEmailRequest`] to the [`RawEmailClient`] it was built with. Plug in
//! the provider SDK of your choice, or a fake one in tests.
//!
//! The `Bcc` header is kept in the compiled message, since the provider delivers from the raw
//! message and strips that header itself.
//!
//! The request `Source` is the envelope sender. An envelope without sender submits a request
//! without `Source`, and the provider then takes the sender from the `From` header of the
//! raw message, which must be present in that case.
//!
//! The outcome of every send is normalized:
//!
//! * errors from the client are returned unmodified as [`Error::Provider`]
//! * a call completing without error and without response gives [`Error::MissingResponse`]
//! * a response without message identifier gives [`Error::MissingAcknowledgment`], unless the
//!   transport accepts unacknowledged messages (see [`AckPolicy`])
//!
//! Nothing is retried.
//!
//! #### Example
//!
//! ```rust
//! # use tokio1_crate as tokio;
//! use async_trait::async_trait;
//! use sesmail::transport::ses::{RawEmailClient, SendRawEmailRequest, SendRawEmailResponse};
//! use sesmail::{Envelope, PreparedMessage, SesTransport, Transport};
//!
//! struct Client;
//!
//! #[async_trait]
//! impl RawEmailClient for Client {
//!     type Error = std::io::Error;
//!
//!     async fn send_raw_email(
//!         &self,
//!         _request: SendRawEmailRequest,
//!     ) -> Result<Option<SendRawEmailResponse>, Self::Error> {
//!         Ok(Some(SendRawEmailResponse::with_message_id("0100017f")))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let email = PreparedMessage::new(Envelope::new(
//!     Some("nobody@domain.tld".parse()?),
//!     vec!["hei@domain.tld".parse()?],
//! )?)
//! .header("From", "NoBody <nobody@domain.tld>")
//! .header("To", "Hei <hei@domain.tld>")
//! .header("Subject", "Happy new year")
//! .body("Be happy!");
//!
//! let mailer = SesTransport::bulk(Client);
//! let response = mailer.send(&email).await?;
//! assert_eq!(response.message_id(), Some("0100017f"));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

pub use self::client::{
    ClientFromConfig, RawEmailClient, RawMessage, SendRawEmailRequest, SendRawEmailResponse,
};
pub use self::config::{Credentials, SesConfig, DEFAULT_SERVICE_URL};
pub use self::response::{normalize, AckPolicy};

use super::{Response, Transport};
use crate::{address::Envelope, message::StreamOptions, Error};

mod client;
mod config;
mod response;

/// Transport submitting raw messages through a [`RawEmailClient`]
#[derive(Debug, Clone)]
pub struct SesTransport<C> {
    client: C,
    config: SesConfig,
    ack_policy: AckPolicy,
}

impl<C> SesTransport<C>
where
    C: RawEmailClient,
{
    /// Transport for bulk sending
    ///
    /// Every response must carry the message identifier assigned by the provider.
    pub fn bulk(client: C) -> SesTransport<C> {
        Self::builder(client).ack_policy(AckPolicy::Required).build()
    }

    /// Transport for single messages
    ///
    /// A response without message identifier is accepted as a success.
    pub fn single(client: C) -> SesTransport<C> {
        Self::builder(client).ack_policy(AckPolicy::Optional).build()
    }

    /// Creates a transport builder around an existing client
    ///
    /// Defaults are:
    ///
    /// * Default [`SesConfig`]
    /// * Acknowledgment required
    pub fn builder(client: C) -> SesTransportBuilder<C> {
        SesTransportBuilder {
            client,
            config: SesConfig::default(),
            ack_policy: AckPolicy::default(),
        }
    }

    /// Creates a transport builder, building the client from `config`
    pub fn from_config(config: SesConfig) -> Result<SesTransportBuilder<C>, Error>
    where
        C: ClientFromConfig,
    {
        let client = C::from_config(&config).map_err(|err| Error::Provider(Box::new(err)))?;
        Ok(Self::builder(client).config(config))
    }

    /// Configuration the transport was built with
    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    /// The provider client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Acknowledgment policy applied to responses
    pub fn ack_policy(&self) -> AckPolicy {
        self.ack_policy
    }
}

/// Builder for [`SesTransport`]
#[derive(Debug, Clone)]
pub struct SesTransportBuilder<C> {
    client: C,
    config: SesConfig,
    ack_policy: AckPolicy,
}

impl<C> SesTransportBuilder<C>
where
    C: RawEmailClient,
{
    /// Set the provider configuration
    pub fn config(mut self, config: SesConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how strictly responses must acknowledge messages
    pub fn ack_policy(mut self, ack_policy: AckPolicy) -> Self {
        self.ack_policy = ack_policy;
        self
    }

    /// Build the transport
    pub fn build(self) -> SesTransport<C> {
        SesTransport {
            client: self.client,
            config: self.config,
            ack_policy: self.ack_policy,
        }
    }
}

#[async_trait]
impl<C> Transport for SesTransport<C>
where
    C: RawEmailClient + Send + Sync,
{
    type Ok = Response;
    type Error = Error;

    fn stream_options(&self) -> StreamOptions {
        StreamOptions::new().keep_bcc(true)
    }

    async fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Response, Error> {
        let request = SendRawEmailRequest::new(envelope, email);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bytes = email.len(),
            recipients = request.destinations().len(),
            "submitting raw message"
        );

        let response = self
            .client
            .send_raw_email(request)
            .await
            .map_err(|err| Error::Provider(Box::new(err)))?;
        let result = normalize(response, self.ack_policy);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(response) => tracing::debug!(message_id = ?response.message_id(), "message accepted"),
            Err(err) => tracing::debug!(error = %err, "message rejected"),
        }

        result
    }
}
