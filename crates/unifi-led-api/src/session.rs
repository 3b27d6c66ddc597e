// Controller session
//
// Bearer-token login against `POST /v1/login`. The token lives behind a
// read/write guard inside the client; requests snapshot it when they are
// built, and only a successful login replaces it.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use crate::client::LedClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse};

/// Session state owned by a single [`LedClient`].
#[derive(Debug)]
pub(crate) struct Session {
    /// Empty until the first successful login.
    bearer_token: SecretString,
    authenticated: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            bearer_token: SecretString::from(String::new()),
            authenticated: false,
        }
    }
}

impl LedClient {
    /// Log in for the first time.
    ///
    /// Same exchange as [`authenticate`](Self::authenticate), but a failure
    /// is returned so callers can refuse to proceed with an unusable client.
    pub async fn connect(&self) -> Result<(), Error> {
        let token = self.login().await?;
        self.store_token(token);
        Ok(())
    }

    /// Exchange the stored credentials for a fresh bearer token.
    ///
    /// Every call performs a new login. On failure the previous token is
    /// kept and `false` is returned.
    pub async fn authenticate(&self) -> bool {
        match self.login().await {
            Ok(token) => {
                self.store_token(token);
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    "could not log in to the LED controller; check connection, username and password"
                );
                false
            }
        }
    }

    /// Whether a login has succeeded on this client.
    pub fn is_authenticated(&self) -> bool {
        read_session(self.session()).authenticated
    }

    /// Snapshot of the current bearer token (empty before the first login).
    pub(crate) fn bearer_token(&self) -> String {
        read_session(self.session())
            .bearer_token
            .expose_secret()
            .to_owned()
    }

    fn store_token(&self, token: SecretString) {
        let mut session = self
            .session()
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        session.bearer_token = token;
        session.authenticated = true;
    }

    async fn login(&self) -> Result<SecretString, Error> {
        let url = self.endpoint(&["login"])?;
        debug!(username = self.username(), "logging in at {}", url);

        let body = LoginRequest {
            username: self.username(),
            password: self.password().expose_secret(),
        };

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        match login.access_token {
            Some(token) if !token.is_empty() => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            _ => Err(Error::Authentication {
                message: "login response carried no access_token".into(),
            }),
        }
    }
}

fn read_session(lock: &RwLock<Session>) -> std::sync::RwLockReadGuard<'_, Session> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}
