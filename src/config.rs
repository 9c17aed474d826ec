//! Session configuration for the tester client.
//!
//! A [`TesterConfig`] is built once from CLI input and is immutable afterwards.
//! It carries the SCIM base URL and one of the two supported authentication
//! schemes; header material is derived from it when the HTTP client is built.

use crate::error::{TesterError, TesterResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

/// SCIM media type sent as both `Accept` and `Content-Type` on every request.
pub const SCIM_CONTENT_TYPE: &str = "application/scim+json;charset=UTF-8";

/// Credentials for one of the two supported authentication schemes.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// HTTP Basic authentication
    Basic { username: String, password: String },
    /// Bearer token authentication
    Bearer { token: String },
}

impl AuthCredentials {
    /// Render the `Authorization` header value for this credential.
    ///
    /// Fails when the chosen scheme is missing required material, so that a
    /// misconfigured tester dies at construction rather than mid-run.
    pub fn authorization_value(&self) -> TesterResult<String> {
        match self {
            Self::Basic { username, password } => {
                if username.is_empty() || password.is_empty() {
                    return Err(TesterError::configuration(
                        "basic auth requires both a username and a password",
                    ));
                }
                let encoded = BASE64.encode(format!("{username}:{password}"));
                Ok(format!("Basic {encoded}"))
            }
            Self::Bearer { token } => {
                if token.is_empty() {
                    return Err(TesterError::configuration("bearer auth requires a token"));
                }
                Ok(format!("Bearer {token}"))
            }
        }
    }
}

/// Immutable session context: base URL plus authentication mode.
#[derive(Debug, Clone)]
pub struct TesterConfig {
    /// Base URL of the SCIM API, e.g. `https://example.ex-tic.com/idm/scimApi/1.0`
    pub base_url: String,
    /// Authentication scheme and credentials
    pub auth: AuthCredentials,
}

impl TesterConfig {
    /// Create a new session configuration.
    pub fn new(base_url: impl Into<String>, auth: AuthCredentials) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
        }
    }

    /// Build the fixed header set applied to every request: the resolved
    /// `Authorization` header plus the SCIM content-type and accept headers.
    pub(crate) fn default_headers(&self) -> TesterResult<HeaderMap> {
        let mut auth_value = HeaderValue::from_str(&self.auth.authorization_value()?)
            .map_err(|e| TesterError::configuration(format!("invalid credential material: {e}")))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static(SCIM_CONTENT_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SCIM_CONTENT_TYPE));
        Ok(headers)
    }
}
