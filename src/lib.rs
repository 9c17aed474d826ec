//! Connection test harness for SCIM 2.0 provisioning endpoints.
//!
//! Exercises a remote identity-management product's `/Users` resource over
//! HTTPS: authenticates with Basic or Bearer credentials, drives a fixed
//! sequence of CRUD and search scenarios, and appends every request/response
//! exchange to a per-run log file.
//!
//! # Core Components
//!
//! - [`ScimClient`] - Authenticated session exposing one method per SCIM operation
//! - [`ScenarioRunner`] - Sequences client operations into narrative scenarios
//! - [`SuiteReport`] - Per-scenario outcomes and the overall verdict
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scim_tester::{AuthCredentials, RunLog, ScenarioRunner, ScimClient, TesterConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TesterConfig::new(
//!     "https://example.ex-tic.com/idm/scimApi/1.0",
//!     AuthCredentials::Bearer { token: "api-token".into() },
//! );
//! let log = Arc::new(RunLog::create("logs")?);
//! let client = ScimClient::new(&config, log)?;
//! let report = ScenarioRunner::new(client).run_all().await;
//! assert!(report.passed());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod report;
pub mod scenarios;

// Re-export commonly used types for convenience
pub use client::ScimClient;
pub use config::{AuthCredentials, SCIM_CONTENT_TYPE, TesterConfig};
pub use error::{TesterError, TesterResult};
pub use payload::{CORE_USER_SCHEMA, EXTIC_USER_SCHEMA, ExtendAttr, UserPayloadBuilder};
pub use report::{RunLog, ScenarioOutcome, SuiteReport};
pub use scenarios::ScenarioRunner;
