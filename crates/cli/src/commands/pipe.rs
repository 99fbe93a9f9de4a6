//! pipe command - Stream stdin to an object
//!
//! Reads stdin to the end and uploads it as one object.

use std::io::Read;

use clap::Args;
use serde::Serialize;
use swc_core::{RemotePath, headers, parse_path};

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, human_size};

/// Stream stdin to an object
#[derive(Args, Debug)]
pub struct PipeArgs {
    /// Destination path (profile/container/object)
    pub target: String,

    /// Content type for the uploaded object
    #[arg(long, default_value = "application/octet-stream")]
    pub content_type: String,

    /// Remove the object after this many seconds
    #[arg(long)]
    pub expire_after: Option<u64>,
}

#[derive(Debug, Serialize)]
struct PipeOutput {
    status: &'static str,
    target: String,
    size_bytes: u64,
    size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cdn_url: Option<String>,
}

/// Execute the pipe command
pub fn execute(args: PipeArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_object_target(&args.target) {
        Ok(target) => target,
        Err(msg) => {
            formatter.error(&msg);
            return ExitCode::UsageError;
        }
    };

    let connection = match connect(&target.profile, &formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };
    let container = match connection.container(&target.container) {
        Ok(container) => container,
        Err(e) => return fail(&formatter, "Failed to open container", &e),
    };

    let mut buffer = Vec::new();
    if let Err(e) = std::io::stdin().read_to_end(&mut buffer) {
        return fail(&formatter, "Failed to read from stdin", &e.into());
    }
    let size = buffer.len() as u64;

    let mut extra = vec![headers::content_type(args.content_type)];
    if let Some(seconds) = args.expire_after {
        extra.push(headers::delete_after(seconds));
    }

    match container.upload_content(&target.key, buffer, &extra) {
        Ok(uploaded) => {
            if formatter.is_json() {
                formatter.json(&PipeOutput {
                    status: "success",
                    target: target.to_string(),
                    size_bytes: size,
                    size_human: human_size(size),
                    etag: uploaded.etag().map(str::to_string),
                    cdn_url: uploaded.cdn_url,
                });
            } else {
                formatter.success(&format!("Uploaded to {target} ({})", human_size(size)));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to upload", &e),
    }
}

/// Parse `profile/container/object`; the object part is required
pub(crate) fn parse_object_target(path: &str) -> Result<RemotePath, String> {
    match parse_path(path) {
        Ok(parsed) => match parsed.as_remote() {
            Some(remote) if !remote.is_dir => Ok(remote.clone()),
            Some(_) => Err(format!("'{path}' does not name an object")),
            None => Err(format!("'{path}' is not a remote path")),
        },
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_target() {
        let target = parse_object_target("selectel/logs/2024/app.log").unwrap();
        assert_eq!(target.container, "logs");
        assert_eq!(target.key, "2024/app.log");

        assert!(parse_object_target("selectel/logs").is_err());
        assert!(parse_object_target("selectel/logs/dir/").is_err());
        assert!(parse_object_target("./local.txt").is_err());
    }
}
