//! Placeholder substitution across a staged starter tree
//!
//! Entry names are rewritten with PascalCase precedence: a name containing
//! the PascalCase placeholder only has that form replaced, even if the
//! lowercase form also occurs. File contents get both forms replaced.
//!
//! Renaming is idempotent only when the project name shares no substring
//! with the placeholders. A name such as `YourAppNamePro` still contains the
//! PascalCase literal after the first pass, so a second pass rewrites it
//! again to `YourAppNameProPro`.

use crate::error::{Result, ScaffoldError};
use crate::product::Placeholder;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Replacement table derived from the placeholder pair and project name
#[derive(Debug, Clone)]
struct Substitution<'a> {
    placeholder: Placeholder,
    name: &'a str,
    lower_name: String,
}

impl<'a> Substitution<'a> {
    fn new(placeholder: Placeholder, name: &'a str) -> Self {
        Self {
            placeholder,
            name,
            lower_name: name.to_lowercase(),
        }
    }

    /// New entry name, or `None` when the name carries no placeholder
    fn entry_name(&self, current: &str) -> Option<String> {
        if current.contains(self.placeholder.pascal) {
            Some(current.replace(self.placeholder.pascal, self.name))
        } else if current.contains(self.placeholder.lower) {
            Some(current.replace(self.placeholder.lower, &self.lower_name))
        } else {
            None
        }
    }

    /// Rewritten contents, or `None` when no placeholder occurs
    fn contents(&self, bytes: &[u8]) -> Option<Vec<u8>> {
        let pascal = replace_bytes(
            bytes,
            self.placeholder.pascal.as_bytes(),
            self.name.as_bytes(),
        );
        let source = pascal.as_deref().unwrap_or(bytes);
        let lower = replace_bytes(
            source,
            self.placeholder.lower.as_bytes(),
            self.lower_name.as_bytes(),
        );
        lower.or(pascal)
    }
}

/// Replace every occurrence of `needle`; `None` if there is none
fn replace_bytes(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Option<Vec<u8>> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0;
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if &haystack[i..i + needle.len()] == needle {
            out.extend_from_slice(&haystack[last..i]);
            out.extend_from_slice(replacement);
            i += needle.len();
            last = i;
        } else {
            i += 1;
        }
    }

    if last == 0 {
        return None;
    }
    out.extend_from_slice(&haystack[last..]);
    Some(out)
}

/// Replace placeholders in every entry name and file body under `root`
///
/// Directories are renamed before their children are visited. The first
/// failure aborts the walk; renames already performed stay on disk.
pub async fn rename_tree(root: &Path, new_name: &str, placeholder: Placeholder) -> Result<()> {
    let substitution = Substitution::new(placeholder, new_name);
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| ScaffoldError::io(&dir, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ScaffoldError::io(&dir, e))?
        {
            names.push(entry.file_name());
        }

        for name in names {
            let mut path = dir.join(&name);
            let metadata = fs::symlink_metadata(&path)
                .await
                .map_err(|e| ScaffoldError::io(&path, e))?;

            let renamed = name
                .to_str()
                .and_then(|n| substitution.entry_name(n))
                .filter(|renamed| name.to_str() != Some(renamed.as_str()));
            if let Some(renamed) = renamed {
                let target = dir.join(renamed);
                if let Ok(existing) = fs::symlink_metadata(&target).await {
                    if !same_entry(&metadata, &existing, &path, &target) {
                        return Err(ScaffoldError::RenameConflict { from: path, to: target });
                    }
                }
                fs::rename(&path, &target)
                    .await
                    .map_err(|e| ScaffoldError::io(&path, e))?;
                path = target;
            }

            if metadata.is_dir() {
                pending.push(path);
            } else if metadata.is_file() {
                rewrite_contents(&path, &substitution).await?;
            }
        }
    }

    Ok(())
}

/// Whether `target` resolves to the entry at `path` itself, as a case-only
/// rename does on a case-insensitive filesystem
#[cfg(unix)]
fn same_entry(
    metadata: &std::fs::Metadata,
    existing: &std::fs::Metadata,
    _path: &Path,
    _target: &Path,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    metadata.dev() == existing.dev() && metadata.ino() == existing.ino()
}

#[cfg(not(unix))]
fn same_entry(
    _metadata: &std::fs::Metadata,
    _existing: &std::fs::Metadata,
    path: &Path,
    target: &Path,
) -> bool {
    path.to_string_lossy()
        .eq_ignore_ascii_case(&target.to_string_lossy())
}

async fn rewrite_contents(path: &Path, substitution: &Substitution<'_>) -> Result<()> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| ScaffoldError::io(path, e))?;
    if let Some(rewritten) = substitution.contents(&bytes) {
        fs::write(path, rewritten)
            .await
            .map_err(|e| ScaffoldError::io(path, e))?;
    }
    Ok(())
}
