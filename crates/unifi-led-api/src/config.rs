use secrecy::SecretString;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// HTTPS port the LED controller listens on out of the box.
pub const DEFAULT_PORT: u16 = 20443;

/// Everything needed to build a [`LedClient`](crate::LedClient).
///
/// Building the client from this config performs no network I/O; the
/// credentials are only exchanged on `connect` / `authenticate`.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller root, e.g. `https://192.168.2.2:20443`.
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
    pub transport: TransportConfig,
}

impl ControllerConfig {
    /// Config for a controller at `host`, on `port` or [`DEFAULT_PORT`].
    pub fn new(
        host: &str,
        port: Option<u16>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let port = port.unwrap_or(DEFAULT_PORT);
        let base_url = Url::parse(&format!("https://{host}:{port}"))?;
        Ok(Self::with_base_url(base_url, username, password))
    }

    /// Config for an explicit base URL (any scheme, any path prefix).
    pub fn with_base_url(
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            base_url,
            username: username.into(),
            password,
            transport: TransportConfig::default(),
        }
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
