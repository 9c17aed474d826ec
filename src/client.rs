//! Tester client: one method per SCIM operation.
//!
//! Each public method performs exactly one HTTP request against the remote
//! `/Users` resource, logs the exchange, and normalizes failure into a
//! sentinel return value (`None`/`false`) instead of propagating an error.
//! The `Result` plumbing lives in private helpers so the request path still
//! reads as ordinary `?`-based code.
//!
//! The client holds no user state: every read re-fetches from the server.

use crate::config::{SCIM_CONTENT_TYPE, TesterConfig};
use crate::error::{TesterError, TesterResult};
use crate::payload::total_results;
use crate::report::RunLog;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;

/// Authenticated SCIM client bound to one base URL and one run log.
pub struct ScimClient {
    http: reqwest::Client,
    base_url: String,
    log: Arc<RunLog>,
}

impl ScimClient {
    /// Build an authenticated client.
    ///
    /// Fails fast on an empty base URL or credentials that are missing for
    /// the chosen auth mode; per-request failures are handled later, inside
    /// each operation.
    pub fn new(config: &TesterConfig, log: Arc<RunLog>) -> TesterResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(TesterError::configuration("base URL must not be empty"));
        }
        let headers = config.default_headers()?;
        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            log,
        })
    }

    /// The run log shared with the scenario runner.
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// GET `/Users?startIndex=1&count=0`; true iff the server answers 2xx.
    pub async fn probe_connection(&self) -> bool {
        self.log.line("=== connectivity probe ===");
        let query = [("startIndex", "1".to_string()), ("count", "0".to_string())];
        match self.get_json(&self.users_url(), &query).await {
            Ok((status, body)) => {
                self.log.line(format!("connection ok, status: {status}"));
                self.log.line(format!("response: {}", pretty(&body)));
                true
            }
            Err(e) => {
                self.log_failure("connection failed", &e);
                false
            }
        }
    }

    /// List users with `startIndex`/`count` paging parameters.
    pub async fn get_users(&self, start_index: usize, count: usize) -> Option<Value> {
        self.log.line("=== list users ===");
        let query = [
            ("startIndex", start_index.to_string()),
            ("count", count.to_string()),
        ];
        match self.get_json(&self.users_url(), &query).await {
            Ok((_, body)) => {
                self.log.line(format!("total users: {}", total_results(&body)));
                Some(body)
            }
            Err(e) => {
                self.log_failure("list users failed", &e);
                None
            }
        }
    }

    /// Find a user by exact `userName`; `None` when absent or on failure.
    pub async fn get_user_by_username(&self, user_name: &str) -> Option<Value> {
        self.log.line(format!("=== find user by name: {user_name} ==="));
        let query = [("filter", format!("userName eq \"{user_name}\""))];
        match self.get_json(&self.users_url(), &query).await {
            Ok((_, body)) => {
                let first = body
                    .get("Resources")
                    .and_then(Value::as_array)
                    .and_then(|resources| resources.first());
                match first {
                    Some(user) if total_results(&body) > 0 => {
                        self.log.line(format!("user found: {}", pretty(user)));
                        Some(user.clone())
                    }
                    _ => {
                        self.log.line(format!("user {user_name} not found"));
                        None
                    }
                }
            }
            Err(e) => {
                self.log_failure("user search failed", &e);
                None
            }
        }
    }

    /// Fetch a user by server-assigned id.
    pub async fn get_user_by_id(&self, id: &str) -> Option<Value> {
        self.log.line(format!("=== fetch user by id: {id} ==="));
        match self.get_json(&self.user_url(id), &[]).await {
            Ok((_, user)) => {
                self.log.line(format!("user: {}", pretty(&user)));
                Some(user)
            }
            Err(e) => {
                self.log_failure("user fetch failed", &e);
                None
            }
        }
    }

    /// POST a new user; returns the created resource including its `id`.
    pub async fn create_user(&self, data: &Value) -> Option<Value> {
        self.log.line("=== create user ===");
        // Header set before json() so the SCIM media type is not replaced
        // with plain application/json.
        let request = self
            .http
            .post(self.users_url())
            .header(CONTENT_TYPE, SCIM_CONTENT_TYPE)
            .json(data);
        match self.send_json(request).await {
            Ok((_, created)) => {
                self.log.line(format!("user created: {}", pretty(&created)));
                Some(created)
            }
            Err(e) => {
                self.log_failure("user creation failed", &e);
                None
            }
        }
    }

    /// PUT a full replacement of the user with the given id.
    pub async fn update_user(&self, id: &str, data: &Value) -> Option<Value> {
        self.log.line(format!("=== update user: {id} ==="));
        let request = self
            .http
            .put(self.user_url(id))
            .header(CONTENT_TYPE, SCIM_CONTENT_TYPE)
            .json(data);
        match self.send_json(request).await {
            Ok((_, updated)) => {
                self.log.line(format!("user updated: {}", pretty(&updated)));
                Some(updated)
            }
            Err(e) => {
                self.log_failure("user update failed", &e);
                None
            }
        }
    }

    /// DELETE the user with the given id; true iff the status is exactly 204.
    pub async fn delete_user(&self, id: &str) -> bool {
        self.log.line(format!("=== delete user: {id} ==="));
        match self.http.delete(self.user_url(id)).send().await {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::NO_CONTENT {
                    self.log.line("user deleted");
                    true
                } else {
                    self.log.line(format!("unexpected status: {status}"));
                    false
                }
            }
            Err(e) => {
                self.log.line(format!("user deletion failed: {e}"));
                false
            }
        }
    }

    /// Run an arbitrary SCIM filter expression against `/Users`.
    ///
    /// The expression is URL-encoded by the query serializer.
    pub async fn search_with_filter(&self, filter: &str) -> Option<Value> {
        self.log.line(format!("=== filtered search: {filter} ==="));
        let query = [("filter", filter.to_string())];
        match self.get_json(&self.users_url(), &query).await {
            Ok((_, body)) => Some(body),
            Err(e) => {
                self.log_failure("filtered search failed", &e);
                None
            }
        }
    }

    fn users_url(&self) -> String {
        format!("{}/Users", self.base_url)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/Users/{id}", self.base_url)
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> TesterResult<(StatusCode, Value)> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send_json(request).await
    }

    /// Send a request and parse the body as JSON, mapping a non-2xx status
    /// into an error that keeps the body for logging.
    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
    ) -> TesterResult<(StatusCode, Value)> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TesterError::unexpected_status(status, body));
        }
        let parsed = serde_json::from_str(&body)?;
        Ok((status, parsed))
    }

    fn log_failure(&self, what: &str, err: &TesterError) {
        self.log.line(format!("{what}: {err}"));
        if let TesterError::UnexpectedStatus { body, .. } = err
            && !body.is_empty()
        {
            self.log.line(format!("error response: {body}"));
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
