//! ls command - List containers and objects
//!
//! Lists containers when given a profile only, or objects when given a
//! container path.

use clap::Args;
use serde::Serialize;
use swc_core::{
    ContainerInfo, ListOptions, ObjectInfo, RemotePath, RemoteTarget, DEFAULT_CONTAINER_LIMIT,
    DEFAULT_OBJECT_LIMIT, parse_remote,
};

use super::{Connection, connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, human_size};

/// List containers or objects
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Remote path (profile, profile/container or profile/container/prefix)
    pub path: String,

    /// Maximum number of entries
    #[arg(long)]
    pub limit: Option<u32>,

    /// Start listing after this name
    #[arg(long)]
    pub marker: Option<String>,

    /// Group names into pseudo-directories up to this delimiter
    #[arg(long, default_value = "/")]
    pub delimiter: String,

    /// List every object below the prefix, without grouping
    #[arg(short, long)]
    pub recursive: bool,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

#[derive(Debug, Serialize)]
struct ContainersOutput {
    containers: Vec<ContainerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct ObjectsOutput {
    container: String,
    items: Vec<ObjectInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_entries: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl Summary {
    fn new(total_entries: usize, total_size_bytes: u64) -> Self {
        Self {
            total_entries,
            total_size_bytes,
            total_size_human: human_size(total_size_bytes),
        }
    }
}

/// Execute the ls command
pub fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_remote(&args.path) {
        Ok(target) => target,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let profile_name = match &target {
        RemoteTarget::Account(name) => name.as_str(),
        RemoteTarget::Container(path) => path.profile.as_str(),
    };
    let connection = match connect(profile_name, &formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };

    match target {
        RemoteTarget::Account(_) => list_containers(&connection, &args, &formatter),
        RemoteTarget::Container(path) => list_objects(&connection, &path, &args, &formatter),
    }
}

fn list_containers(connection: &Connection, args: &LsArgs, formatter: &Formatter) -> ExitCode {
    let limit = args.limit.unwrap_or(DEFAULT_CONTAINER_LIMIT);
    let marker = args.marker.as_deref().unwrap_or_default();

    let containers = match connection.catalog.list(limit, marker) {
        Ok(containers) => containers,
        Err(e) => return fail(formatter, "Failed to list containers", &e),
    };

    let total_size: u64 = containers.iter().filter_map(ContainerInfo::bytes).sum();
    let summary = args
        .summarize
        .then(|| Summary::new(containers.len(), total_size));

    if formatter.is_json() {
        formatter.json(&ContainersOutput {
            containers,
            summary,
        });
        return ExitCode::Success;
    }

    for container in &containers {
        let count = container.count().unwrap_or_default();
        let size = container.bytes().map(human_size).unwrap_or_default();
        formatter.println(&format!(
            "{:>10} {:>8} {}/",
            size,
            count,
            container.name()
        ));
    }
    if let Some(summary) = summary {
        formatter.println(&format!(
            "\nTotal: {} containers, {}",
            summary.total_entries, summary.total_size_human
        ));
    }

    ExitCode::Success
}

/// Listing options for a container path
fn object_options(path: &RemotePath, args: &LsArgs) -> ListOptions {
    let prefix = if path.key.is_empty() || path.key.ends_with('/') {
        path.key.clone()
    } else if args.recursive {
        path.key.clone()
    } else {
        format!("{}/", path.key)
    };

    ListOptions {
        limit: args.limit.unwrap_or(DEFAULT_OBJECT_LIMIT),
        marker: args.marker.clone(),
        prefix: (!prefix.is_empty()).then_some(prefix),
        delimiter: (!args.recursive).then(|| args.delimiter.clone()),
        ..Default::default()
    }
}

fn list_objects(
    connection: &Connection,
    path: &RemotePath,
    args: &LsArgs,
    formatter: &Formatter,
) -> ExitCode {
    let container = match connection.container(&path.container) {
        Ok(container) => container,
        Err(e) => return fail(formatter, "Failed to open container", &e),
    };

    let items = match container.list(&object_options(path, args)) {
        Ok(listing) => listing.into_vec(),
        Err(e) => return fail(formatter, "Failed to list objects", &e),
    };

    let total_size: u64 = items.iter().filter_map(ObjectInfo::bytes).sum();
    let summary = args.summarize.then(|| {
        Summary::new(items.iter().filter(|item| !item.is_dir()).count(), total_size)
    });

    if formatter.is_json() {
        formatter.json(&ObjectsOutput {
            container: path.container.clone(),
            items,
            summary,
        });
        return ExitCode::Success;
    }

    for item in &items {
        formatter.println(&format_object_line(item));
    }
    if let Some(summary) = summary {
        formatter.println(&format!(
            "\nTotal: {} objects, {}",
            summary.total_entries, summary.total_size_human
        ));
    }

    ExitCode::Success
}

/// `[2024-01-15 16:41:49]  1.50 KiB name`
fn format_object_line(item: &ObjectInfo) -> String {
    let date = item
        .last_modified()
        .map(|d| d.chars().take(19).collect::<String>().replace('T', " "))
        .unwrap_or_else(|| " ".repeat(19));

    if item.subdir().is_some() {
        format!("[{date}] {:>10} {}", "DIR", item.key())
    } else {
        let size = human_size(item.bytes().unwrap_or_default());
        format!("[{date}] {size:>10} {}", item.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(recursive: bool) -> LsArgs {
        LsArgs {
            path: String::new(),
            limit: None,
            marker: None,
            delimiter: "/".to_string(),
            recursive,
            summarize: false,
        }
    }

    #[test]
    fn test_object_options_container_root() {
        let options = object_options(&RemotePath::new("s", "c", ""), &args(false));
        assert_eq!(options.prefix, None);
        assert_eq!(options.delimiter.as_deref(), Some("/"));
        assert_eq!(options.limit, DEFAULT_OBJECT_LIMIT);
        assert_eq!(options.path, None);
    }

    #[test]
    fn test_object_options_folder_prefix() {
        let options = object_options(&RemotePath::new("s", "c", "photos"), &args(false));
        assert_eq!(options.prefix.as_deref(), Some("photos/"));
    }

    #[test]
    fn test_object_options_recursive_keeps_raw_prefix() {
        let options = object_options(&RemotePath::new("s", "c", "greeting"), &args(true));
        assert_eq!(options.prefix.as_deref(), Some("greeting"));
        assert_eq!(options.delimiter, None);
    }

    #[test]
    fn test_format_object_line() {
        let item: ObjectInfo = serde_json::from_str(
            r#"{"name":"a.txt","bytes":1536,"last_modified":"2024-01-15T16:41:49.390270"}"#,
        )
        .unwrap();
        assert_eq!(
            format_object_line(&item),
            "[2024-01-15 16:41:49]   1.50 KiB a.txt"
        );

        let dir: ObjectInfo = serde_json::from_str(r#"{"subdir":"photos/"}"#).unwrap();
        assert!(format_object_line(&dir).ends_with("DIR photos/"));
    }
}
