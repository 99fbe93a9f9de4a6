//! rm command - Remove objects
//!
//! The service reports a missing object with 404. That is a warning, not an
//! error, and `--force` silences it.

use std::collections::BTreeMap;

use clap::Args;
use serde::Serialize;
use swc_core::RemotePath;

use super::pipe::parse_object_target;
use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove objects
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object path(s) to remove (profile/container/object)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Do not warn about objects that do not exist
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
}

/// Group targets by profile and container so each account authenticates once
fn group_targets(targets: Vec<RemotePath>) -> BTreeMap<(String, String), Vec<RemotePath>> {
    let mut groups: BTreeMap<(String, String), Vec<RemotePath>> = BTreeMap::new();
    for target in targets {
        groups
            .entry((target.profile.clone(), target.container.clone()))
            .or_default()
            .push(target);
    }
    groups
}

/// Execute the rm command
pub fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let mut targets = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        match parse_object_target(path) {
            Ok(target) => targets.push(target),
            Err(msg) => {
                formatter.error(&msg);
                return ExitCode::UsageError;
            }
        }
    }

    let mut output = RmOutput {
        status: "success",
        deleted: Vec::new(),
        missing: Vec::new(),
        failed: Vec::new(),
    };
    let mut code = ExitCode::Success;

    let mut connections = BTreeMap::new();
    for ((profile_name, container_name), group) in group_targets(targets) {
        tracing::debug!(
            target: super::TRACING_TARGET,
            profile = %profile_name,
            container = %container_name,
            objects = group.len(),
            "Removing objects"
        );
        if !connections.contains_key(&profile_name) {
            match connect(&profile_name, &formatter) {
                Ok(connection) => {
                    connections.insert(profile_name.clone(), connection);
                }
                Err(failed) => return failed,
            }
        }
        let Some(connection) = connections.get(&profile_name) else {
            continue;
        };

        let container = match connection.container(&container_name) {
            Ok(container) => container,
            Err(e) => {
                code = fail(&formatter, "Failed to open container", &e);
                output.failed.extend(group.iter().map(ToString::to_string));
                continue;
            }
        };

        for target in group {
            match container.delete(&target.key) {
                Ok(outcome) if outcome.succeeded => {
                    if !formatter.is_json() {
                        formatter.println(&format!("Removed: {target}"));
                    }
                    output.deleted.push(target.to_string());
                }
                Ok(outcome) if outcome.status() == 404 => {
                    if !args.force {
                        formatter.warning(&format!("Object not found: {target}"));
                    }
                    output.missing.push(target.to_string());
                }
                Ok(outcome) => {
                    formatter.error(&format!(
                        "Failed to remove {target} (status {})",
                        outcome.status()
                    ));
                    output.failed.push(target.to_string());
                    code = ExitCode::GeneralError;
                }
                Err(e) => {
                    code = fail(&formatter, &format!("Failed to remove {target}"), &e);
                    output.failed.push(target.to_string());
                }
            }
        }
    }

    if formatter.is_json() {
        if !output.failed.is_empty() {
            output.status = "partial";
        }
        formatter.json(&output);
    } else if !output.deleted.is_empty() {
        formatter.success(&format!("Removed {} object(s).", output.deleted.len()));
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_targets() {
        let targets = vec![
            RemotePath::new("a", "c1", "x"),
            RemotePath::new("b", "c1", "y"),
            RemotePath::new("a", "c1", "z"),
            RemotePath::new("a", "c2", "w"),
        ];
        let groups = group_targets(targets);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&("a".to_string(), "c1".to_string())].len(), 2);
    }
}
