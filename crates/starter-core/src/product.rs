//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a product must implement to configure
//! where the starter comes from and how it is stitched into the generated
//! project.

use crate::error::{Result, ScaffoldError};
use std::path::Path;
use url::Url;

/// Placeholder literals embedded in starter file names and contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// PascalCase form, replaced by the project name as supplied
    pub pascal: &'static str,
    /// Lowercase form, replaced by the lower-cased project name
    pub lower: &'static str,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            pascal: "YourAppName",
            lower: "yourappname",
        }
    }
}

/// Configuration trait for products built on the starter pipeline
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Manifest and archive locations
/// - Placeholder literals and the typed entry point
/// - The runtime dependency added to untyped projects
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, temp dir prefix)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL of the version manifest
    fn manifest_url(&self) -> &'static str;

    /// Environment variable name for overriding the manifest URL
    fn manifest_url_env(&self) -> &'static str;

    /// Default base URL that starter archives are published under
    fn archive_base_url(&self) -> &'static str;

    /// Environment variable name for overriding the archive base URL
    fn archive_base_url_env(&self) -> &'static str;

    /// Program invoked to generate the base project
    fn generator_program(&self) -> &'static str {
        "react-native"
    }

    /// Placeholder literals used by the starter archives
    fn placeholder(&self) -> Placeholder {
        Placeholder::default()
    }

    /// Typed entry point inside the staged tree, relative to the staging root
    fn typed_entry_point(&self) -> &'static Path {
        Path::new("App.tsx")
    }

    /// Dependency name and requirement inserted into untyped projects
    fn runtime_dependency(&self) -> (&'static str, &'static str) {
        ("react-native-unimodules", "^0.4.1")
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

/// Effective remote locations after environment overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub manifest: Url,
    pub archive_base: Url,
}

impl Sources {
    /// Resolve locations from a product config, honouring env overrides
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let manifest = std::env::var(config.manifest_url_env())
            .unwrap_or_else(|_| config.manifest_url().to_string());
        let archive_base = std::env::var(config.archive_base_url_env())
            .unwrap_or_else(|_| config.archive_base_url().to_string());
        Ok(Self {
            manifest: parse_url(&manifest)?,
            archive_base: parse_url(&archive_base)?,
        })
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ScaffoldError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
