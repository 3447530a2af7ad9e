//! Engine configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gatekeeper_core::Origin;
use gatekeeper_policy::{parse_classpath, PolicyLocation, PolicyProperties};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Configuration for building an [`Engine`](crate::Engine).
///
/// Every field has a default, so `{}` is a valid configuration:
///
/// ```rust
/// use gatekeeper::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "filter_bad_defaults": false }"#).unwrap();
/// assert!(!config.filter_bad_defaults);
/// assert!(config.template_policy.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Baseline policy on disk. The embedded `security.json` when unset.
    pub template_policy: Option<PathBuf>,
    /// Sandbox policy on disk. The embedded `untrusted.json` when unset.
    pub untrusted_policy: Option<PathBuf>,
    /// Classpath of the running process, for the baseline policy only.
    pub classpath: Vec<Origin>,
    /// Whether bad defaults of the platform policy are denied.
    pub filter_bad_defaults: bool,
    /// Extra `${name}` expansions shared by both policies.
    pub properties: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_policy: None,
            untrusted_policy: None,
            classpath: Vec::new(),
            filter_bad_defaults: true,
            properties: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_template_policy(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_policy = Some(path.into());
        self
    }

    pub fn with_untrusted_policy(mut self, path: impl Into<PathBuf>) -> Self {
        self.untrusted_policy = Some(path.into());
        self
    }

    pub fn with_classpath(mut self, classpath: Vec<Origin>) -> Self {
        self.classpath = classpath;
        self
    }

    /// Set the classpath from a separator-joined string, as found in the
    /// process environment.
    pub fn with_classpath_str(mut self, classpath: &str) -> Result<Self> {
        self.classpath = parse_classpath(classpath)?;
        Ok(self)
    }

    pub fn with_filter_bad_defaults(mut self, filter: bool) -> Self {
        self.filter_bad_defaults = filter;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Where the baseline policy is read from.
    pub fn template_location(&self) -> PolicyLocation {
        match &self.template_policy {
            Some(path) => PolicyLocation::File(path.clone()),
            None => PolicyLocation::template(),
        }
    }

    /// Where the sandbox policy is read from.
    pub fn untrusted_location(&self) -> PolicyLocation {
        match &self.untrusted_policy {
            Some(path) => PolicyLocation::File(path.clone()),
            None => PolicyLocation::untrusted(),
        }
    }

    /// The configured expansions, without classpath entries.
    pub fn policy_properties(&self) -> PolicyProperties {
        PolicyProperties::from(self.properties.clone())
    }
}
