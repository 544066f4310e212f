//! Overlaying the staged starter onto the generated project

use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// One staged entry, relative to the staging root
struct StagedEntry {
    relative: PathBuf,
    is_dir: bool,
}

/// Move everything under `staging` into `destination`, then delete `staging`
///
/// Existing destination files are overwritten. There is no rollback: if a
/// move fails, files moved so far stay in place.
pub async fn merge(staging: &Path, destination: &Path) -> Result<()> {
    let entries = collect_entries(staging)?;

    for entry in &entries {
        let target = destination.join(&entry.relative);
        if target.starts_with(staging) {
            return Err(ScaffoldError::Move {
                from: staging.join(&entry.relative),
                to: target,
                reason: "target lies inside the staging directory".to_string(),
            });
        }
    }

    // Parents precede children in walk order.
    for entry in &entries {
        let from = staging.join(&entry.relative);
        let to = destination.join(&entry.relative);
        if entry.is_dir {
            fs::create_dir_all(&to)
                .await
                .map_err(|e| ScaffoldError::Move {
                    from,
                    to: to.clone(),
                    reason: e.to_string(),
                })?;
        } else {
            move_file(&from, &to).await?;
        }
    }

    fs::remove_dir_all(staging)
        .await
        .map_err(|e| ScaffoldError::io(staging, e))
}

fn collect_entries(staging: &Path) -> Result<Vec<StagedEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(staging).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(staging).to_path_buf();
            ScaffoldError::io(path, std::io::Error::other(e.to_string()))
        })?;
        let relative = entry
            .path()
            .strip_prefix(staging)
            .map(Path::to_path_buf)
            .map_err(|e| ScaffoldError::io(entry.path(), std::io::Error::other(e)))?;
        entries.push(StagedEntry {
            relative,
            is_dir: entry.file_type().is_dir(),
        });
    }
    Ok(entries)
}

/// Move one file, replacing an existing file at `to`
///
/// Falls back to copy and delete when a rename is not possible, as happens
/// across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    let move_error = |reason: String| ScaffoldError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        reason,
    };

    if let Ok(existing) = fs::symlink_metadata(to).await {
        if existing.is_dir() {
            return Err(move_error("a directory with that name exists".to_string()));
        }
        fs::remove_file(to)
            .await
            .map_err(|e| move_error(e.to_string()))?;
    }

    if fs::rename(from, to).await.is_err() {
        fs::copy(from, to)
            .await
            .map_err(|e| move_error(e.to_string()))?;
        fs::remove_file(from)
            .await
            .map_err(|e| move_error(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_merge_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("MyApp");
        let staging = project.join("temp");
        write(&project, "App.js", "generated");
        write(&project, "index.js", "untouched");
        write(&staging, "App.js", "from starter");

        merge(&staging, &project).await.unwrap();

        assert_eq!(std::fs::read_to_string(project.join("App.js")).unwrap(), "from starter");
        assert_eq!(std::fs::read_to_string(project.join("index.js")).unwrap(), "untouched");
    }

    #[tokio::test]
    async fn test_merge_creates_nested_directories_and_removes_staging() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("MyApp");
        let staging = project.join("temp");
        write(&project, "ios/MyApp/AppDelegate.m", "generated");
        write(&staging, "ios/MyApp/AppDelegate.m", "starter delegate");
        write(&staging, "src/screens/Home.tsx", "home");
        std::fs::create_dir_all(staging.join("assets/empty")).unwrap();

        merge(&staging, &project).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(project.join("ios/MyApp/AppDelegate.m")).unwrap(),
            "starter delegate"
        );
        assert!(project.join("src/screens/Home.tsx").is_file());
        assert!(project.join("assets/empty").is_dir());
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_file_over_directory_is_a_move_error() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("MyApp");
        let staging = project.join("temp");
        std::fs::create_dir_all(project.join("android")).unwrap();
        write(&staging, "android", "not a directory");

        let err = merge(&staging, &project).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Move { .. }));
    }

    #[tokio::test]
    async fn test_entries_landing_in_staging_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("MyApp");
        let staging = project.join("temp");
        write(&staging, "temp/notes.txt", "clash");

        let err = merge(&staging, &project).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Move { .. }));
        assert!(staging.join("temp/notes.txt").is_file());
    }
}
