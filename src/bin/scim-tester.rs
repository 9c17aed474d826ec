//! Command-line entry point for the SCIM connection test suite.
//!
//! ## Usage
//!
//! ```bash
//! scim-tester <base_url> basic <username> <password>
//! scim-tester <base_url> bearer <token>
//! ```
//!
//! Runs the full scenario suite against the given endpoint. Exit code 0 when
//! the connectivity probe and every scenario pass, 1 on bad arguments or any
//! failure. Each run writes a timestamped log under `logs/`.

use scim_tester::{AuthCredentials, RunLog, ScenarioRunner, ScimClient, TesterConfig};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  basic auth:  scim-tester <base_url> basic <username> <password>");
    eprintln!("  bearer auth: scim-tester <base_url> bearer <token>");
}

fn parse_args(args: &[String]) -> Option<TesterConfig> {
    let base_url = args.get(1)?.clone();
    let mode = args.get(2)?.to_ascii_lowercase();
    let auth = match mode.as_str() {
        "basic" => AuthCredentials::Basic {
            username: args.get(3)?.clone(),
            password: args.get(4)?.clone(),
        },
        "bearer" => AuthCredentials::Bearer {
            token: args.get(3)?.clone(),
        },
        _ => return None,
    };
    Some(TesterConfig::new(base_url, auth))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(config) = parse_args(&args) else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let log = match RunLog::create("logs") {
        Ok(log) => Arc::new(log),
        Err(e) => {
            eprintln!("failed to create run log: {e}");
            return ExitCode::FAILURE;
        }
    };
    let client = match ScimClient::new(&config, Arc::clone(&log)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to build client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = ScenarioRunner::new(client).run_all().await;
    if report.passed() {
        log.line("result: all tests passed");
        ExitCode::SUCCESS
    } else {
        log.line(format!(
            "result: suite failed, see {}",
            log.path().display()
        ));
        ExitCode::FAILURE
    }
}
