//! stat command - Show metadata
//!
//! Account metadata for a profile, container metadata for a container, or
//! the listing record of a single object.

use clap::Args;
use serde::Serialize;
use swc_core::http::Headers;
use swc_core::{Error, ListOptions, ObjectInfo, ObjectListing, RemoteTarget, parse_remote};

use super::{Connection, connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, human_size};

/// Show account, container or object metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Path (profile, profile/container or profile/container/object)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct MetadataOutput {
    path: String,
    metadata: Headers,
}

#[derive(Debug, Serialize)]
struct ObjectOutput {
    path: String,
    object: ObjectInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    cdn_url: Option<String>,
}

/// Execute the stat command
pub fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_remote(&args.path) {
        Ok(target) => target,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    match target {
        RemoteTarget::Account(profile_name) => {
            let connection = match connect(&profile_name, &formatter) {
                Ok(connection) => connection,
                Err(code) => return code,
            };
            match connection.catalog.account_info() {
                Ok(metadata) => print_metadata(&formatter, profile_name, metadata),
                Err(e) => fail(&formatter, "Failed to read account metadata", &e),
            }
        }
        RemoteTarget::Container(path) => {
            let connection = match connect(&path.profile, &formatter) {
                Ok(connection) => connection,
                Err(code) => return code,
            };
            if path.key.is_empty() {
                match connection.container(&path.container) {
                    Ok(container) => {
                        print_metadata(&formatter, path.to_string(), container.info().clone())
                    }
                    Err(e) => fail(&formatter, "Failed to read container metadata", &e),
                }
            } else {
                stat_object(&connection, &path.container, &path.key, &formatter)
            }
        }
    }
}

fn print_metadata(formatter: &Formatter, path: String, metadata: Headers) -> ExitCode {
    if formatter.is_json() {
        formatter.json(&MetadataOutput { path, metadata });
        return ExitCode::Success;
    }

    formatter.println(&format!("Path: {path}"));
    for (name, value) in &metadata {
        formatter.println(&format!("  {name}: {value}"));
    }
    ExitCode::Success
}

/// The first listing entry at or after `name`, if it is exactly `name`
fn find_object(listing: ObjectListing, name: &str) -> Option<ObjectInfo> {
    listing
        .into_vec()
        .into_iter()
        .find(|object| object.name() == Some(name))
}

fn stat_object(
    connection: &Connection,
    container_name: &str,
    name: &str,
    formatter: &Formatter,
) -> ExitCode {
    let container = match connection.container(container_name) {
        Ok(container) => container,
        Err(e) => return fail(formatter, "Failed to open container", &e),
    };

    let options = ListOptions {
        prefix: Some(name.to_string()),
        limit: 1,
        ..Default::default()
    };
    let object = match container.list(&options) {
        Ok(listing) => find_object(listing, name),
        Err(e) => return fail(formatter, "Failed to read object metadata", &e),
    };

    let path = format!("{}/{container_name}/{name}", connection.profile.name);
    let Some(object) = object else {
        return fail(formatter, "Failed to stat", &Error::NotFound(path));
    };
    let cdn_url = container.cdn_url(name);

    if formatter.is_json() {
        formatter.json(&ObjectOutput {
            path,
            object,
            cdn_url,
        });
        return ExitCode::Success;
    }

    formatter.println(&format!("Path:          {path}"));
    formatter.println(&format!(
        "Size:          {}",
        human_size(object.bytes().unwrap_or_default())
    ));
    if let Some(content_type) = object.content_type() {
        formatter.println(&format!("Content-Type:  {content_type}"));
    }
    if let Some(hash) = object.hash() {
        formatter.println(&format!("ETag:          {hash}"));
    }
    if let Some(modified) = object.last_modified() {
        formatter.println(&format!("Last-Modified: {modified}"));
    }
    if let Some(url) = cdn_url {
        formatter.println(&format!("CDN URL:       {url}"));
    }

    ExitCode::Success
}
