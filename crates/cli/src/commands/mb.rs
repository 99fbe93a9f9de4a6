//! mb command - Make container

use clap::Args;
use serde::Serialize;
use swc_core::{ContainerType, Error, RemoteTarget, parse_remote};

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a container
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Target path (profile/container)
    pub target: String,

    /// Access type: private, public or gallery
    #[arg(long = "type", default_value = "private")]
    pub container_type: ContainerType,

    /// Ignore error if the container already exists
    #[arg(short = 'p', long)]
    pub ignore_existing: bool,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    status: &'static str,
    container: String,
    #[serde(rename = "type")]
    container_type: ContainerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Parse `profile/container`
pub(crate) fn parse_container_target(target: &str) -> Result<(String, String), Error> {
    match parse_remote(target)? {
        RemoteTarget::Container(path) if path.key.is_empty() => Ok((path.profile, path.container)),
        _ => Err(Error::InvalidPath(format!(
            "'{target}' is not a container path. Use format: profile/container"
        ))),
    }
}

/// Execute the mb command
pub fn execute(args: MbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (profile_name, container) = match parse_container_target(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let connection = match connect(&profile_name, &formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };

    if args.ignore_existing {
        match connection.catalog.select(&container, None) {
            Ok(_) => {
                if formatter.is_json() {
                    formatter.json(&MbOutput {
                        status: "success",
                        container,
                        container_type: args.container_type,
                        message: Some("Container already exists".to_string()),
                    });
                } else {
                    formatter.success(&format!(
                        "Container '{profile_name}/{container}' already exists."
                    ));
                }
                return ExitCode::Success;
            }
            Err(Error::NotFound(_)) => {}
            Err(e) => return fail(&formatter, "Failed to check container", &e),
        }
    }

    match connection.catalog.create(&container, args.container_type) {
        Ok(handle) => {
            if formatter.is_json() {
                formatter.json(&MbOutput {
                    status: "success",
                    container: handle.name().to_string(),
                    container_type: args.container_type,
                    message: None,
                });
            } else {
                formatter.success(&format!(
                    "Container '{profile_name}/{container}' created ({}).",
                    args.container_type
                ));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to create container", &e),
    }
}
