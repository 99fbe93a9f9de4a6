//! cat command - Write object contents to stdout

use std::io::Write;

use clap::Args;

use super::pipe::parse_object_target;
use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Display object contents
#[derive(Args, Debug)]
pub struct CatArgs {
    /// Object path(s) (profile/container/object)
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Execute the cat command
pub fn execute(args: CatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    for path in &args.paths {
        let code = cat_object(path, &formatter);
        if code != ExitCode::Success {
            return code;
        }
    }
    ExitCode::Success
}

fn cat_object(path: &str, formatter: &Formatter) -> ExitCode {
    let target = match parse_object_target(path) {
        Ok(target) => target,
        Err(msg) => {
            formatter.error(&msg);
            return ExitCode::UsageError;
        }
    };

    let connection = match connect(&target.profile, formatter) {
        Ok(connection) => connection,
        Err(code) => return code,
    };
    let container = match connection.container(&target.container) {
        Ok(container) => container,
        Err(e) => return fail(formatter, "Failed to open container", &e),
    };

    let content = match container.download(&target.key) {
        Ok(content) => content,
        Err(e) => return fail(formatter, &format!("Failed to read {target}"), &e),
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&content).and_then(|()| stdout.flush()) {
        // Broken pipe from `| head` is not an error
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            return ExitCode::Success;
        }
        return fail(formatter, "Failed to write to stdout", &e.into());
    }
    ExitCode::Success
}
