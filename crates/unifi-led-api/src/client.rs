// LED controller HTTP client
//
// Owns the reqwest client, the controller base URL and the session. Every
// controller operation goes through `execute`, which attaches the current
// bearer token and performs the single re-login-and-replay on HTTP 403.
// Endpoint groups (session, devices, groups) live in sibling files as
// inherent methods so this module stays focused on transport mechanics.

use std::sync::RwLock;

use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ControllerConfig;
use crate::error::Error;
use crate::models::Command;
use crate::session::Session;

/// Longest slice of an error body kept in [`Error::Api`].
const ERROR_BODY_PREVIEW: usize = 200;

/// Async client for a UniFi LED controller.
///
/// Construction is two-phase: [`LedClient::new`] only builds the HTTP
/// client, and [`LedClient::connect`] performs the first login. Operations
/// issued before a successful login carry an empty bearer token; the
/// controller rejects them with 403 and the client logs in on demand.
///
/// The read operations resolve to `None` and the commands to `false` when
/// they cannot complete. Failures are reported through `tracing`, never
/// returned.
#[derive(Debug)]
pub struct LedClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    session: RwLock<Session>,
}

/// A controller request, kept whole so it can be replayed after re-login.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    /// Path segments below `/v1`.
    path: Vec<String>,
    body: Option<Command>,
}

impl ApiRequest {
    pub(crate) fn get(path: &[&str]) -> Self {
        Self {
            method: Method::GET,
            path: path.iter().map(ToString::to_string).collect(),
            body: None,
        }
    }

    pub(crate) fn put(path: &[&str], body: Command) -> Self {
        Self {
            method: Method::PUT,
            path: path.iter().map(ToString::to_string).collect(),
            body: Some(body),
        }
    }
}

impl LedClient {
    /// Build a client from `config`. No request is sent.
    pub fn new(config: ControllerConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Ok(Self::with_client(
            http,
            config.base_url,
            config.username,
            config.password,
        ))
    }

    /// Build a client around a pre-configured `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
            session: RwLock::new(Session::default()),
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn session(&self) -> &RwLock<Session> {
        &self.session
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}/v1/{segments...}`, with each segment percent-encoded.
    pub(crate) fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, Error> {
        let mut endpoint = self.base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(endpoint)
    }

    // ── Authenticated execution ──────────────────────────────────────

    /// Send `request` with the current token. On HTTP 403, log in once and
    /// replay the identical request once. Nothing else is retried.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, Error> {
        match self.send(request).await {
            Err(Error::Forbidden) => {
                warn!(path = ?request.path, "403 from controller, trying to log in again");
                if !self.authenticate().await {
                    return Err(Error::ReauthenticationFailed);
                }
                self.send(request).await
            }
            result => result,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, Error> {
        let url = self.endpoint(&request.path)?;
        debug!("{} {}", request.method, url);

        // Token is captured here, at build time.
        let token = self.bearer_token();
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(token);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        parse_response(resp).await
    }

    // ── Outcome helpers ──────────────────────────────────────────────

    /// Resolve a read to `Some(data)` or `None`, logging the failure.
    pub(crate) fn read_outcome<T>(result: Result<T, Error>, what: &str) -> Option<T> {
        match result {
            Ok(data) => Some(data),
            Err(e) => {
                error!(error = %e, "could not get {what}");
                None
            }
        }
    }

    /// Resolve a command to `true` only when `confirmed` accepts the echoed
    /// body. Transport, HTTP and auth failures log and resolve to `false`.
    pub(crate) fn command_outcome(
        result: Result<Value, Error>,
        what: &str,
        confirmed: impl FnOnce(&Value) -> bool,
    ) -> bool {
        match result {
            Ok(echo) => {
                let applied = confirmed(&echo);
                if !applied {
                    warn!(echo = %echo, "controller did not confirm {what}");
                }
                applied
            }
            Err(e) => {
                error!(error = %e, "could not {what}");
                false
            }
        }
    }
}

/// Map the HTTP status, then decode the JSON body.
///
/// 403 becomes [`Error::Forbidden`] so `execute` can tell it apart from
/// every other rejection.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == StatusCode::FORBIDDEN {
        return Err(Error::Forbidden);
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}
