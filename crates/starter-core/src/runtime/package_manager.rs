//! Package manager selection

use semver::Version;
use std::fmt;
use std::process::Command;

/// Oldest yarn without the missing-manifest bug
const MIN_YARN_VERSION: Version = Version::new(0, 16, 0);

/// Package managers the generated project can be installed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Prefer yarn unless npm is forced or no usable yarn is installed
    pub fn select(force_npm: bool) -> Self {
        if force_npm {
            return PackageManager::Npm;
        }
        Self::select_with(yarn_version().as_deref())
    }

    /// Selection given the reported yarn version, if any
    pub fn select_with(yarn_version: Option<&str>) -> Self {
        match yarn_version {
            Some(v) if supports_yarn(v) => PackageManager::Yarn,
            _ => PackageManager::Npm,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Get the installed yarn version (if available)
pub fn yarn_version() -> Option<String> {
    Command::new("yarn")
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn supports_yarn(version: &str) -> bool {
    let cleaned = version.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).is_ok_and(|v| v >= MIN_YARN_VERSION)
}
