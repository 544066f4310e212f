//! rn-starter CLI - React Native projects with the unimodules TypeScript starter

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use starter_core::tui::CreateArgs;
use starter_core::ProductConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// rn-starter product configuration
#[derive(Clone)]
pub struct RnStarterConfig;

impl ProductConfig for RnStarterConfig {
    fn name(&self) -> &'static str {
        "rn-starter"
    }

    fn display_name(&self) -> &'static str {
        "React Native unimodules starter"
    }

    fn manifest_url(&self) -> &'static str {
        "https://github.com/Youmenomi/react-native-unimodules-ts-starter/raw/master/corr.yml"
    }

    fn manifest_url_env(&self) -> &'static str {
        "RN_STARTER_MANIFEST_URL"
    }

    fn archive_base_url(&self) -> &'static str {
        "https://github.com/Youmenomi/react-native-unimodules-ts-starter/releases/download/0.1.0"
    }

    fn archive_base_url_env(&self) -> &'static str {
        "RN_STARTER_ARCHIVE_URL"
    }
}

#[derive(Parser, Debug)]
#[command(name = "rn-starter")]
#[command(about = "CLI for creating React Native projects from the unimodules TypeScript starter")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a directory with an example project
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Project directory to create; its name becomes the app name
    pub directory: PathBuf,

    /// Use the TypeScript template
    #[arg(short, long)]
    pub typescript: bool,

    /// Starter version to use instead of the manifest default
    #[arg(short, long, value_name = "VERSION")]
    pub starter: Option<String>,

    /// Force usage of npm
    #[arg(short, long)]
    pub npm: bool,
}

impl From<InitArgs> for CreateArgs {
    fn from(args: InitArgs) -> Self {
        CreateArgs {
            directory: args.directory,
            starter: args.starter,
            typescript: args.typescript,
            npm: args.npm,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    match args.command {
        Some(Command::Init(init_args)) => {
            let result = starter_core::run(&RnStarterConfig, init_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        None => {
            Args::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
