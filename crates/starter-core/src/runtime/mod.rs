//! External tools the pipeline drives
//!
//! This module provides:
//! - The base-project generator invocation
//! - Package manager selection
//! - Dependency installation after integration

mod command;
pub mod generator;
pub mod install;
pub mod package_manager;

pub use generator::{GenerateRequest, ProjectGenerator, ReactNativeGenerator};
pub use install::{CommandInstaller, Installer};
pub use package_manager::PackageManager;
