//! Shared helpers for the integration suites: a throwaway run log and a
//! stateful in-memory `/Users` endpoint mounted on wiremock.

use scim_tester::{AuthCredentials, RunLog, ScimClient, TesterConfig};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Run log writing into a unique temp directory.
pub fn run_log() -> Arc<RunLog> {
    let dir = std::env::temp_dir().join(format!("scim-tester-{}", Uuid::new_v4().simple()));
    Arc::new(RunLog::create(&dir).expect("create run log"))
}

/// Client with basic auth pointed at the given mock server.
pub fn basic_client(server: &MockServer) -> ScimClient {
    let config = TesterConfig::new(
        server.uri(),
        AuthCredentials::Basic {
            username: "testuser".to_string(),
            password: "testpass".to_string(),
        },
    );
    ScimClient::new(&config, run_log()).expect("build client")
}

/// Minimal in-memory SCIM user store answering `/Users` requests.
///
/// Supports list (with a `userName eq "<name>"` filter; any other filter
/// matches nothing), create with a server-assigned id, fetch/replace/delete
/// by id. Enough surface for the scenario scripts to run end to end.
pub struct InMemoryScim {
    users: Mutex<HashMap<String, Value>>,
}

impl InMemoryScim {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    fn list_response(matches: Vec<Value>) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
            "totalResults": matches.len(),
            "Resources": matches,
        }))
    }

    fn not_found() -> ResponseTemplate {
        ResponseTemplate::new(404).set_body_json(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
            "status": "404",
            "detail": "User not found",
        }))
    }
}

impl Respond for InMemoryScim {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path().to_string();
        let mut users = self.users.lock().expect("user store lock");

        match (request.method.as_str(), path.as_str()) {
            ("GET", "/Users") => {
                let filter = request
                    .url
                    .query_pairs()
                    .find(|(key, _)| key == "filter")
                    .map(|(_, value)| value.into_owned());
                let matches: Vec<Value> = match filter {
                    Some(expr) => match expr
                        .strip_prefix("userName eq \"")
                        .and_then(|rest| rest.strip_suffix('"'))
                    {
                        Some(name) => users
                            .values()
                            .filter(|user| {
                                user.get("userName").and_then(Value::as_str) == Some(name)
                            })
                            .cloned()
                            .collect(),
                        None => Vec::new(),
                    },
                    None => users.values().cloned().collect(),
                };
                Self::list_response(matches)
            }
            ("POST", "/Users") => {
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return ResponseTemplate::new(400);
                };
                let id = Uuid::new_v4().to_string();
                if let Some(user) = body.as_object_mut() {
                    user.insert("id".to_string(), Value::String(id.clone()));
                }
                users.insert(id, body.clone());
                ResponseTemplate::new(201).set_body_json(body)
            }
            ("GET", user_path) if user_path.starts_with("/Users/") => {
                let id = &user_path["/Users/".len()..];
                match users.get(id) {
                    Some(user) => ResponseTemplate::new(200).set_body_json(user),
                    None => Self::not_found(),
                }
            }
            ("PUT", user_path) if user_path.starts_with("/Users/") => {
                let id = user_path["/Users/".len()..].to_string();
                if !users.contains_key(&id) {
                    return Self::not_found();
                }
                let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
                    return ResponseTemplate::new(400);
                };
                if let Some(user) = body.as_object_mut() {
                    user.insert("id".to_string(), Value::String(id.clone()));
                }
                users.insert(id, body.clone());
                ResponseTemplate::new(200).set_body_json(body)
            }
            ("DELETE", user_path) if user_path.starts_with("/Users/") => {
                let id = &user_path["/Users/".len()..];
                if users.remove(id).is_some() {
                    ResponseTemplate::new(204)
                } else {
                    Self::not_found()
                }
            }
            _ => ResponseTemplate::new(404),
        }
    }
}

/// Start a mock server backed by a fresh in-memory user store.
pub async fn scim_stub() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(InMemoryScim::new())
        .mount(&server)
        .await;
    server
}
