//! Starter Core - integration engine for React Native starter templates
//!
//! A project is created by running an external generator (`react-native
//! init`) and overlaying a versioned starter archive on the result. This
//! library owns everything between those two: resolving the starter version,
//! staging the archive, adapting it to the typed or untyped variant,
//! replacing the naming placeholders and merging it into the project.
//!
//! # Architecture
//!
//! - **Templates** - manifest resolution, archive staging, variant
//!   adaptation, placeholder renaming, tree merging
//! - **Runtime** - the generator, package manager selection, installers
//! - **Pipeline** - the stage sequencer, driven through `ProductConfig`
//! - **TUI** - optional cliclack front end (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based front end and reporter
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use starter_core::{Pipeline, PlainReporter, ProjectRequest};
//!
//! let reporter = PlainReporter;
//! let mut pipeline = Pipeline::production(&MyConfig, &reporter)?;
//! let outcome = pipeline.run(&ProjectRequest {
//!     target_dir: "/work/MyApp".into(),
//!     starter_version: None,
//!     use_typed: false,
//!     force_npm: false,
//! }).await?;
//! ```

pub mod error;
pub mod pipeline;
pub mod product;
pub mod report;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::ScaffoldError;
pub use pipeline::{Outcome, Pipeline, ProjectRequest, Stage};
pub use product::{Placeholder, ProductConfig, Sources};
pub use report::{PlainReporter, Reporter};
pub use runtime::PackageManager;
pub use templates::{
    merge, rename_tree, resolve, stage, LanguageVariant, ResolvedVersion, VersionManifest,
};

#[cfg(feature = "tui")]
pub use tui::run;
