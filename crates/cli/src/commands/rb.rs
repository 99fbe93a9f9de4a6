//! rb command - Remove container
//!
//! Only empty containers can be removed; the service answers 409 otherwise.

use clap::Args;
use serde::Serialize;

use super::mb::parse_container_target;
use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove a container
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Target path (profile/container)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    status: &'static str,
    container: String,
    http_status: u16,
}

/// Execute the rb command
pub fn execute(args: RbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (profile_name, container) = match parse_container_target(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let connection = match connect(&profile_name, &formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };

    let outcome = match connection.catalog.delete(&container) {
        Ok(outcome) => outcome,
        Err(e) => return fail(&formatter, "Failed to remove container", &e),
    };

    let code = match outcome.status() {
        _ if outcome.succeeded => ExitCode::Success,
        409 => {
            formatter.error(&format!(
                "Container '{profile_name}/{container}' is not empty"
            ));
            ExitCode::Conflict
        }
        status => {
            formatter.error(&format!(
                "Failed to remove container '{profile_name}/{container}' (status {status})"
            ));
            ExitCode::GeneralError
        }
    };

    if formatter.is_json() {
        formatter.json(&RbOutput {
            status: if outcome.succeeded { "success" } else { "failed" },
            container,
            http_status: outcome.status(),
        });
    } else if outcome.succeeded {
        if outcome.status() == 404 {
            formatter.warning(&format!(
                "Container '{profile_name}/{container}' did not exist"
            ));
        }
        formatter.success(&format!("Removed '{profile_name}/{container}'."));
    }

    code
}
