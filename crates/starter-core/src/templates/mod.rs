//! Starter template integration
//!
//! This module provides:
//! - Version manifest parsing and starter version resolution
//! - Manifest and archive retrieval from remote URLs or local files
//! - Archive staging into the project's `temp` directory
//! - Typed/untyped variant adaptation
//! - Placeholder renaming across the staged tree
//! - Merging the staged tree into the generated project

pub mod fetcher;
pub mod manifest;
pub mod merge;
pub mod rename;
pub mod stager;
pub mod variant;

pub use fetcher::{Fetch, HttpFetcher};
pub use manifest::{resolve, ResolvedVersion, StarterRelease, VersionManifest};
pub use merge::merge;
pub use rename::rename_tree;
pub use stager::{archive_url, stage, Decompress, ZipDecompressor, STAGING_DIR};
pub use variant::LanguageVariant;
