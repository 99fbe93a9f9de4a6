//! CLI command definitions and execution
//!
//! Every command parses its paths, loads the profile, authenticates once
//! and then issues its storage calls through the shared catalog.

use clap::{Parser, Subcommand};
use swc_core::{ContainerCatalog, ContainerHandle, Error, Executor, Profile, ProfileManager};
use swc_http::{HttpTransport, TransportConfig};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod cat;
mod cp;
mod ls;
mod mb;
mod mkdir;
mod pipe;
mod profile;
mod rb;
mod rm;
mod stat;

/// swc - Swift storage CLI client
///
/// A command-line interface for Swift-compatible object storage services.
#[derive(Parser, Debug)]
#[command(name = "swc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage account profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// List containers and objects
    Ls(ls::LsArgs),

    /// Create a container
    Mb(mb::MbArgs),

    /// Remove an empty container
    Rb(rb::RbArgs),

    /// Show account, container or object metadata
    Stat(stat::StatArgs),

    /// Upload, download or copy objects
    Cp(cp::CpArgs),

    /// Create a virtual directory
    Mkdir(mkdir::MkdirArgs),

    /// Stream stdin to an object
    Pipe(pipe::PipeArgs),

    /// Display object contents
    Cat(cat::CatArgs),

    /// Remove objects
    Rm(rm::RmArgs),
}

/// Execute the CLI command and return an exit code
pub fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Profile(cmd) => profile::execute(cmd, output_config),
        Commands::Ls(args) => ls::execute(args, output_config),
        Commands::Mb(args) => mb::execute(args, output_config),
        Commands::Rb(args) => rb::execute(args, output_config),
        Commands::Stat(args) => stat::execute(args, output_config),
        Commands::Cp(args) => cp::execute(args, output_config),
        Commands::Mkdir(args) => mkdir::execute(args, output_config),
        Commands::Pipe(args) => pipe::execute(args, output_config),
        Commands::Cat(args) => cat::execute(args, output_config),
        Commands::Rm(args) => rm::execute(args, output_config),
    }
}

/// Tracing target for command execution.
pub const TRACING_TARGET: &str = "swc_cli::commands";

/// Report an error and map it to its exit code
pub(crate) fn fail(formatter: &Formatter, context: &str, err: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {err}"));
    ExitCode::from(err)
}

/// An authenticated account
pub(crate) struct Connection {
    pub profile: Profile,
    pub catalog: ContainerCatalog,
}

impl Connection {
    /// Open a container, attaching the profile's CDN base URL
    pub fn container(&self, name: &str) -> swc_core::Result<ContainerHandle> {
        self.catalog.select(name, self.profile.cdn.as_deref())
    }
}

/// Load a profile and authenticate against its auth endpoint
pub(crate) fn connect(profile_name: &str, formatter: &Formatter) -> Result<Connection, ExitCode> {
    let profile = ProfileManager::new()
        .and_then(|manager| manager.get(profile_name))
        .map_err(|e| fail(formatter, "Failed to load profile", &e))?;

    tracing::debug!(
        target: TRACING_TARGET,
        profile = profile_name,
        auth_url = %profile.auth_url,
        insecure = profile.insecure,
        "Connecting"
    );

    let transport = HttpTransport::new(TransportConfig::from_profile(&profile))
        .map_err(|e| fail(formatter, "Failed to create HTTP client", &e))?;

    let auth_url = profile
        .auth_endpoint()
        .map_err(|e| fail(formatter, "Invalid profile", &e))?;

    let catalog = ContainerCatalog::connect(Executor::new(transport), &auth_url, &profile.credentials())
        .map_err(|e| fail(formatter, &format!("Cannot connect with profile '{profile_name}'"), &e))?;

    Ok(Connection { profile, catalog })
}
