use std::fmt;

/// Endpoint used when none is configured
pub const DEFAULT_SERVICE_URL: &str = "https://email.us-east-1.amazonaws.com";

/// Provider settings handed to the client constructor
///
/// The transport keeps its configuration for the whole of its life and never
/// changes it. Nothing in here is interpreted by the transport itself.
///
/// ```rust
/// use sesmail::transport::ses::{Credentials, SesConfig};
///
/// let config = SesConfig::new()
///     .service_url("https://email.eu-west-1.amazonaws.com")
///     .credentials(Credentials::new("AKIDEXAMPLE", "secret"));
///
/// assert_eq!(config.region(), Some("eu-west-1"));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SesConfig {
    service_url: String,
    region: Option<String>,
    credentials: Option<Credentials>,
}

impl Default for SesConfig {
    fn default() -> Self {
        SesConfig {
            service_url: DEFAULT_SERVICE_URL.into(),
            region: None,
            credentials: None,
        }
    }
}

impl SesConfig {
    /// Default configuration: `us-east-1` endpoint, credentials resolved by the client
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API endpoint
    pub fn service_url<S: Into<String>>(mut self, service_url: S) -> Self {
        self.service_url = service_url.into();
        self
    }

    /// Sets the region, overriding the one found in the endpoint
    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets explicit credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// API endpoint
    pub fn get_service_url(&self) -> &str {
        &self.service_url
    }

    /// Region of the endpoint
    ///
    /// The configured region, or the one embedded in an
    /// `email.<region>.amazonaws.com` endpoint.
    pub fn region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .or_else(|| region_from_url(&self.service_url))
    }

    /// Explicit credentials, if any
    pub fn get_credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

fn region_from_url(url: &str) -> Option<&str> {
    let host = url.splitn(2, "://").last()?;
    let host = host.split(|c: char| c == '/' || c == ':').next()?;
    let region = host
        .strip_prefix("email.")?
        .strip_suffix(".amazonaws.com")?;

    if region.is_empty() || region.contains('.') {
        None
    } else {
        Some(region)
    }
}

/// Access key pair, with an optional session token
///
/// The secret parts are never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    session_token: Option<String>,
}

impl Credentials {
    /// Create a `Credentials` struct from access key id and secret
    pub fn new<I: Into<String>, S: Into<String>>(access_key_id: I, secret_access_key: S) -> Self {
        Credentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Adds a session token, for temporary credentials
    pub fn session_token<S: Into<String>>(mut self, token: S) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Access key id
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Session token, for temporary credentials
    pub fn get_session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
