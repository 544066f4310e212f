//! Version manifest types and parsing
//!
//! The manifest maps starter versions to the generator version they were
//! cut against, plus a `default` key naming one of those versions:
//!
//! ```yaml
//! default: 0.1.0
//! 0.1.0:
//!   react-native: 0.60.4
//! ```

use super::fetcher::Fetch;
use crate::error::{Result, ScaffoldError};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const DEFAULT_KEY: &str = "default";

/// A published starter revision
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StarterRelease {
    /// Generator version the starter was built against
    #[serde(rename = "react-native", alias = "generatorVersion", alias = "generator_version")]
    pub generator_version: String,
}

/// Parsed version manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionManifest {
    /// Starter version used when none is requested
    pub default: String,

    /// Releases keyed by starter version
    pub releases: BTreeMap<String, StarterRelease>,
}

/// Outcome of resolving a starter version against the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub starter_version: String,
    pub generator_version: String,
}

// Keys and scalar values are read through `deserialize_str`, so unquoted
// versions such as `1.0` or `0.60` keep their exact spelling instead of
// being coerced to floats.
impl<'de> Deserialize<'de> for VersionManifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = VersionManifest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of starter versions with a `default` key")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<VersionManifest, A::Error> {
                let mut default = None;
                let mut releases = BTreeMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == DEFAULT_KEY {
                        if default.is_some() {
                            return Err(de::Error::duplicate_field(DEFAULT_KEY));
                        }
                        default = Some(map.next_value::<String>()?);
                    } else {
                        let release = map.next_value::<StarterRelease>()?;
                        releases.insert(key, release);
                    }
                }

                let default = default.ok_or_else(|| de::Error::missing_field(DEFAULT_KEY))?;
                Ok(VersionManifest { default, releases })
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

impl VersionManifest {
    /// Parse manifest text and check its invariants
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: VersionManifest =
            serde_yaml::from_str(content).map_err(|e| ScaffoldError::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if let Some((key, _)) = self
            .releases
            .iter()
            .find(|(_, release)| release.generator_version.trim().is_empty())
        {
            return Err(ScaffoldError::Manifest(format!(
                "starter version '{}' has an empty generator version",
                key
            )));
        }

        if !self.releases.contains_key(&self.default) {
            return Err(ScaffoldError::Manifest(format!(
                "default points at '{}', which is not a listed starter version",
                self.default
            )));
        }

        Ok(())
    }

    /// Pick the effective starter version and its generator version
    pub fn resolve(&self, requested: Option<&str>) -> Result<ResolvedVersion> {
        let starter_version = requested.unwrap_or(&self.default);
        let release = self
            .releases
            .get(starter_version)
            .ok_or_else(|| ScaffoldError::UnknownVersion(starter_version.to_string()))?;

        Ok(ResolvedVersion {
            starter_version: starter_version.to_string(),
            generator_version: release.generator_version.clone(),
        })
    }
}

/// Fetch the manifest at `source` and resolve `requested` against it
pub async fn resolve<F: Fetch>(
    fetcher: &F,
    source: &Url,
    requested: Option<&str>,
) -> Result<ResolvedVersion> {
    let bytes = fetcher.fetch(source).await?;
    let content = String::from_utf8(bytes)
        .map_err(|_| ScaffoldError::Manifest("manifest is not valid UTF-8".to_string()))?;
    VersionManifest::parse(&content)?.resolve(requested)
}
