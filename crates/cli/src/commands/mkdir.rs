//! mkdir command - Create a virtual directory marker

use clap::Args;
use serde::Serialize;
use swc_core::{Error, RemoteTarget, parse_remote};

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a virtual directory
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Directory path (profile/container/dir)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    status: &'static str,
    directory: String,
}

/// Execute the mkdir command
pub fn execute(args: MkdirArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_remote(&args.path) {
        Ok(RemoteTarget::Container(path)) if !path.key.trim_end_matches('/').is_empty() => path,
        Ok(_) => {
            let err = Error::InvalidPath("Use format: profile/container/dir".into());
            return fail(&formatter, "Invalid path", &err);
        }
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };
    let name = path.key.trim_end_matches('/');

    let connection = match connect(&path.profile, &formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };
    let container = match connection.container(&path.container) {
        Ok(container) => container,
        Err(e) => return fail(&formatter, "Failed to open container", &e),
    };

    if let Err(e) = container.create_directory(name) {
        return fail(&formatter, "Failed to create directory", &e);
    }

    let directory = format!("{}/{}/{name}/", path.profile, path.container);
    if formatter.is_json() {
        formatter.json(&MkdirOutput {
            status: "success",
            directory,
        });
    } else {
        formatter.success(&format!("Created '{directory}'."));
    }
    ExitCode::Success
}
