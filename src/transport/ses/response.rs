use super::SendRawEmailResponse;
use crate::{transport::Response, Error};

/// How strictly a provider response must acknowledge the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AckPolicy {
    /// A response without a message identifier is an error
    Required,
    /// Any response is a success, with or without a message identifier
    Optional,
}

impl Default for AckPolicy {
    fn default() -> Self {
        AckPolicy::Required
    }
}

/// Turns a provider response into the outcome of a send
///
/// Only depends on its arguments: the same response always gives the same
/// outcome. A missing response is an error under both policies. An empty
/// message identifier counts as missing.
pub fn normalize(response: Option<SendRawEmailResponse>, policy: AckPolicy) -> Result<Response, Error> {
    let response = response.ok_or(Error::MissingResponse)?;

    let message_id = response
        .message_id()
        .filter(|id| !id.is_empty())
        .map(str::to_owned);

    match (message_id, policy) {
        (None, AckPolicy::Required) => Err(Error::MissingAcknowledgment),
        (message_id, _) => Ok(Response::new(message_id)),
    }
}
