//! Starter archive download and staging
//!
//! The archive for a starter version is published as
//! `modify-<starterVersion>.zip` under a fixed release location and is
//! unpacked into `<project>/temp`, where the later stages rewrite it before
//! it is merged into the project.

use super::fetcher::Fetch;
use crate::error::{Result, ScaffoldError};
use crate::report::Reporter;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use url::Url;
use zip::ZipArchive;

/// Name of the staging directory created inside the project
pub const STAGING_DIR: &str = "temp";

/// Lockfile shipped inside starter archives; never reused
const ARCHIVE_LOCKFILE: &str = "package-lock.json";

/// Capability to unpack archive bytes into a directory
///
/// Implementations do blocking I/O; [`stage`] runs them on the blocking pool.
pub trait Decompress: Clone + Send + Sync + 'static {
    fn decompress(&self, bytes: &[u8], dest: &Path) -> Result<()>;
}

/// Zip decompressor that refuses entries escaping the destination
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipDecompressor;

impl Decompress for ZipDecompressor {
    fn decompress(&self, bytes: &[u8], dest: &Path) -> Result<()> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ScaffoldError::Decompress(e.to_string()))?;

        if archive.is_empty() {
            return Err(ScaffoldError::Decompress(
                "archive contains no entries".to_string(),
            ));
        }

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| ScaffoldError::Decompress(e.to_string()))?;

            let relative = file.enclosed_name().ok_or_else(|| {
                ScaffoldError::Decompress(format!(
                    "entry '{}' points outside the staging directory",
                    file.name()
                ))
            })?;
            let out_path = dest.join(relative);

            if file.is_dir() {
                std::fs::create_dir_all(&out_path)
                    .map_err(|e| ScaffoldError::io(&out_path, e))?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
            }

            let mut out_file =
                std::fs::File::create(&out_path).map_err(|e| ScaffoldError::io(&out_path, e))?;
            std::io::copy(&mut file, &mut out_file)
                .map_err(|e| ScaffoldError::Decompress(format!("{}: {}", file.name(), e)))?;

            #[cfg(unix)]
            if let Some(mode) = file.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| ScaffoldError::io(&out_path, e))?;
            }
        }

        Ok(())
    }
}

/// Build the archive URL for a starter version, preserving query parameters
pub fn archive_url(base: &Url, starter_version: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ScaffoldError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot have path segments".to_string(),
        })?
        .pop_if_empty()
        .push(&format!("modify-{}.zip", starter_version));
    Ok(url)
}

/// Download the starter archive and unpack it into `<project_dir>/temp`
///
/// Returns the staging directory path.
pub async fn stage<F: Fetch, D: Decompress>(
    fetcher: &F,
    decompressor: &D,
    archive_base: &Url,
    starter_version: &str,
    project_dir: &Path,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    let url = archive_url(archive_base, starter_version)?;
    let staging = project_dir.join(STAGING_DIR);

    if tokio::fs::symlink_metadata(&staging).await.is_ok() {
        return Err(ScaffoldError::PathExists(staging));
    }

    reporter.info(&format!("Downloading {}", url));
    let bytes = fetcher.fetch(&url).await?;

    tokio::fs::create_dir_all(&staging)
        .await
        .map_err(|e| ScaffoldError::io(&staging, e))?;
    let unpack = {
        let decompressor = decompressor.clone();
        let staging = staging.clone();
        tokio::task::spawn_blocking(move || decompressor.decompress(&bytes, &staging))
    };
    unpack
        .await
        .map_err(|e| ScaffoldError::Decompress(e.to_string()))??;

    let lockfile = staging.join(ARCHIVE_LOCKFILE);
    match tokio::fs::remove_file(&lockfile).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(ScaffoldError::io(&lockfile, e)),
    }

    Ok(staging)
}
