//! Interactive project creation session

use super::reporter::CliclackReporter;
use crate::pipeline::{Outcome, Pipeline, ProjectRequest};
use crate::product::ProductConfig;
use crate::report::{PlainReporter, Reporter};
use anyhow::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

const OUTRO: &str = "Successful Fusion Dance. Happy Coding!";

/// CLI arguments for the init command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory to create; its name becomes the project name
    pub directory: PathBuf,

    /// Starter version to use instead of the manifest default
    pub starter: Option<String>,

    /// Keep the TypeScript entry point
    pub typescript: bool,

    /// Install with npm even when yarn is available
    pub npm: bool,
}

/// Create a project, reporting progress inline
///
/// Pipeline failures are reported through the active reporter and turned
/// into a failing exit code; only errors outside the pipeline are returned.
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<ExitCode> {
    // Spinners and banners only make sense on a terminal; piped output gets plain lines.
    let interactive = std::io::stdout().is_terminal();
    if interactive {
        cliclack::intro(config.display_name())?;
    }

    let current_dir = std::env::current_dir()?;
    let target_dir = if args.directory.is_absolute() {
        args.directory.clone()
    } else {
        current_dir.join(&args.directory)
    };

    let spinner_reporter = CliclackReporter::default();
    let reporter: &dyn Reporter = if interactive {
        &spinner_reporter
    } else {
        &PlainReporter
    };
    let mut pipeline = Pipeline::production(config, reporter)?;
    let result = pipeline
        .run(&ProjectRequest {
            target_dir,
            starter_version: args.starter,
            use_typed: args.typescript,
            force_npm: args.npm,
        })
        .await;

    match result {
        Ok(outcome) => {
            print_next_steps(&outcome, interactive)?;
            Ok(ExitCode::SUCCESS)
        }
        // Already shown by the reporter
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn print_next_steps(outcome: &Outcome, interactive: bool) -> Result<()> {
    println!();
    for line in outcome.run_instructions() {
        println!("  {}", line);
    }
    println!();

    if interactive {
        cliclack::outro(OUTRO)?;
    } else {
        println!("{}", OUTRO);
    }

    Ok(())
}
