//! Typed/untyped variant adaptation of a staged starter
//!
//! Starters ship in the typed form. For an untyped project the typed entry
//! point becomes a `.js` file, the starter's own `package.json` is dropped in
//! favour of the generator's, and the runtime dependency the typed
//! `package.json` would have provided is declared in the project manifest.

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::report::Reporter;
use std::path::Path;
use tokio::fs;

const PACKAGE_MANIFEST: &str = "package.json";
const UNTYPED_EXTENSION: &str = "js";

/// Variant adaptation settings for a product
#[derive(Debug, Clone)]
pub struct LanguageVariant<'a> {
    /// Typed entry point relative to the staging root
    pub entry_point: &'a Path,
    /// Dependency name declared for untyped projects
    pub dependency: &'a str,
    /// Version requirement of that dependency
    pub requirement: &'a str,
}

impl<'a> LanguageVariant<'a> {
    pub fn from_config<C: ProductConfig>(config: &'a C) -> Self {
        let (dependency, requirement) = config.runtime_dependency();
        Self {
            entry_point: config.typed_entry_point(),
            dependency,
            requirement,
        }
    }

    /// Adapt the staged tree to the requested variant
    ///
    /// Only files under `staging` and `<project_dir>/package.json` are
    /// touched. When the generator version does not appear verbatim in the
    /// project manifest the dependency is not inserted and a warning is
    /// reported instead.
    pub async fn adapt(
        &self,
        staging: &Path,
        project_dir: &Path,
        use_typed: bool,
        generator_version: &str,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        if use_typed {
            return Ok(());
        }

        self.untype_entry_point(staging).await?;

        let staged_manifest = staging.join(PACKAGE_MANIFEST);
        match fs::remove_file(&staged_manifest).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ScaffoldError::io(&staged_manifest, e)),
        }

        let manifest_path = project_dir.join(PACKAGE_MANIFEST);
        let manifest = fs::read_to_string(&manifest_path)
            .await
            .map_err(|e| ScaffoldError::io(&manifest_path, e))?;

        match self.declare_dependency(&manifest, generator_version) {
            Some(updated) => fs::write(&manifest_path, updated)
                .await
                .map_err(|e| ScaffoldError::io(&manifest_path, e))?,
            None => reporter.warn(&format!(
                "\"react-native\": \"{}\" not found in {}; add \"{}\": \"{}\" to its dependencies manually",
                generator_version,
                manifest_path.display(),
                self.dependency,
                self.requirement
            )),
        }

        Ok(())
    }

    async fn untype_entry_point(&self, staging: &Path) -> Result<()> {
        let typed = staging.join(self.entry_point);
        let untyped = typed.with_extension(UNTYPED_EXTENSION);

        if fs::symlink_metadata(&untyped).await.is_ok() {
            return Err(ScaffoldError::RenameConflict {
                from: typed,
                to: untyped,
            });
        }
        fs::rename(&typed, &untyped)
            .await
            .map_err(|e| ScaffoldError::io(&typed, e))?;

        let (Some(old_name), Some(new_name)) = (typed.file_name(), untyped.file_name()) else {
            return Ok(());
        };
        let (old_name, new_name) = (old_name.to_string_lossy(), new_name.to_string_lossy());

        let source = fs::read_to_string(&untyped)
            .await
            .map_err(|e| ScaffoldError::io(&untyped, e))?;
        if source.contains(&*old_name) {
            fs::write(&untyped, source.replace(&*old_name, &new_name))
                .await
                .map_err(|e| ScaffoldError::io(&untyped, e))?;
        }

        Ok(())
    }

    /// Insert the dependency after the exact `react-native` declaration
    fn declare_dependency(&self, manifest: &str, generator_version: &str) -> Option<String> {
        let anchor = format!("\"react-native\": \"{}\"", generator_version);
        if !manifest.contains(&anchor) {
            return None;
        }
        let declaration = format!(
            "{},\n    \"{}\": \"{}\"",
            anchor, self.dependency, self.requirement
        );
        Some(manifest.replacen(&anchor, &declaration, 1))
    }
}
