//! Profile management commands
//!
//! Profiles are named storage accounts: auth endpoint, credentials and
//! transport options.

use clap::Subcommand;
use serde::Serialize;
use swc_core::path::is_valid_profile_name;
use swc_core::{Profile, ProfileManager, TimeoutConfig};

use super::fail;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "selectel", "backup")
    pub name: String,

    /// Account user (X-Auth-User)
    pub user: String,

    /// Account key (X-Auth-Key)
    #[arg(env = "SWC_KEY")]
    pub key: String,

    /// Auth endpoint URL
    #[arg(long, default_value = swc_core::DEFAULT_AUTH_URL)]
    pub auth_url: String,

    /// CDN base URL for public object links
    #[arg(long)]
    pub cdn: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, default_value = "false")]
    pub insecure: bool,

    /// Connect timeout in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Total request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show auth endpoints and options
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    pub name: String,
}

/// Profile information for output (the key is never shown)
#[derive(Debug, Serialize)]
struct ProfileInfo {
    name: String,
    auth_url: String,
    user: String,
    insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cdn: Option<String>,
    timeout: TimeoutConfig,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            auth_url: profile.auth_url.clone(),
            user: profile.user.clone(),
            insecure: profile.insecure,
            cdn: profile.cdn.clone(),
            timeout: profile.timeout_config(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ProfileManager::new() {
        Ok(manager) => manager,
        Err(e) => return fail(&formatter, "Failed to load configuration", &e),
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, &manager, &formatter),
        ProfileCommands::List(args) => execute_list(&args, &manager, &formatter),
        ProfileCommands::Remove(args) => execute_remove(&args, &manager, &formatter),
    }
}

/// Build a profile from `profile set` arguments
fn build_profile(args: SetArgs) -> Result<Profile, String> {
    if !is_valid_profile_name(&args.name) {
        return Err(format!(
            "Invalid profile name '{}'. Use letters, digits, '_' and '-'",
            args.name
        ));
    }
    if args.user.is_empty() {
        return Err("User cannot be empty".to_string());
    }

    let mut profile = Profile::new(&args.name, args.user, args.key);
    profile.auth_url = args.auth_url;
    profile.auth_endpoint().map_err(|e| e.to_string())?;
    profile.insecure = args.insecure;
    profile.cdn = args.cdn.map(|cdn| {
        if cdn.ends_with('/') {
            cdn
        } else {
            format!("{cdn}/")
        }
    });

    if args.connect_timeout_ms.is_some() || args.timeout_ms.is_some() {
        let defaults = TimeoutConfig::default();
        profile.timeout = Some(TimeoutConfig {
            connect_ms: args.connect_timeout_ms.unwrap_or(defaults.connect_ms),
            request_ms: args.timeout_ms.unwrap_or(defaults.request_ms),
        });
    }

    Ok(profile)
}

fn execute_set(args: SetArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profile = match build_profile(args) {
        Ok(profile) => profile,
        Err(msg) => {
            formatter.error(&msg);
            return ExitCode::UsageError;
        }
    };
    let name = profile.name.clone();

    if profile.insecure {
        formatter.warning(&format!(
            "Profile '{name}' skips TLS certificate verification"
        ));
    }

    match manager.set(profile) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: name.clone(),
                    message: format!("Profile '{name}' configured successfully"),
                });
            } else {
                formatter.success(&format!("Profile '{name}' configured successfully."));
            }
            ExitCode::Success
        }
        Err(e) => fail(formatter, "Failed to save profile", &e),
    }
}

fn execute_list(args: &ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profiles = match manager.list() {
        Ok(profiles) => profiles,
        Err(e) => return fail(formatter, "Failed to list profiles", &e),
    };

    if formatter.is_json() {
        let infos: Vec<ProfileInfo> = profiles.iter().map(ProfileInfo::from).collect();
        formatter.json(&serde_json::json!({ "profiles": infos }));
        return ExitCode::Success;
    }

    if profiles.is_empty() {
        formatter.println("No profiles configured.");
        return ExitCode::Success;
    }

    for profile in &profiles {
        if args.long {
            let timeout = profile.timeout_config();
            let mut line = format!(
                "{:<12} {} (user: {}, connect {} ms, timeout {} ms",
                profile.name, profile.auth_url, profile.user, timeout.connect_ms, timeout.request_ms
            );
            if let Some(cdn) = &profile.cdn {
                line.push_str(&format!(", cdn: {cdn}"));
            }
            if profile.insecure {
                line.push_str(", insecure");
            }
            line.push(')');
            formatter.println(&line);
        } else {
            formatter.println(&format!("{:<12} {}", profile.name, profile.auth_url));
        }
    }

    ExitCode::Success
}

fn execute_remove(args: &RemoveArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name.clone(),
                    message: format!("Profile '{}' removed", args.name),
                });
            } else {
                formatter.success(&format!("Profile '{}' removed.", args.name));
            }
            ExitCode::Success
        }
        Err(e) => fail(formatter, "Failed to remove profile", &e),
    }
}
