//! Post-integration dependency installation

use super::command::{display_command, run_inherited};
use super::package_manager::PackageManager;
use crate::error::{Result, ScaffoldError};
use crate::report::Reporter;
use std::future::Future;
use std::path::Path;

/// Capability to install the finished project's dependencies
pub trait Installer: Send + Sync {
    fn install(
        &self,
        project_dir: &Path,
        package_manager: PackageManager,
        reporter: &dyn Reporter,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Installer> Installer for &T {
    fn install(
        &self,
        project_dir: &Path,
        package_manager: PackageManager,
        reporter: &dyn Reporter,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).install(project_dir, package_manager, reporter)
    }
}

/// Installer running the package manager, then CocoaPods for iOS
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandInstaller;

async fn run_step(program: &str, args: &[String], cwd: &Path) -> Result<()> {
    run_inherited(program, args, cwd)
        .await
        .map_err(|reason| ScaffoldError::InstallFailed {
            command: display_command(program, args),
            reason,
        })
}

impl Installer for CommandInstaller {
    async fn install(
        &self,
        project_dir: &Path,
        package_manager: PackageManager,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let install = vec!["install".to_string()];

        reporter.info(&format!("Running {} install", package_manager));
        run_step(package_manager.program(), &install, project_dir).await?;

        let ios_dir = project_dir.join("ios");
        if ios_dir.is_dir() {
            reporter.info("Running pod install");
            run_step("pod", &install, &ios_dir).await?;
        } else {
            reporter.info("No ios directory found, skipping pod install");
        }

        Ok(())
    }
}
