//! Per-plugin static policies keyed by plugin origin.

use std::collections::HashMap;

use gatekeeper_core::Origin;

use crate::document::{PolicyDocument, PolicyLocation};
use crate::error::{PolicyError, Result};
use crate::properties::PolicyProperties;
use crate::static_policy::StaticPolicy;

/// Plugin policies, looked up by the file path of the plugin's origin.
///
/// Built once at startup and then only read.
#[derive(Debug, Clone, Default)]
pub struct PluginGrants {
    by_origin: HashMap<String, StaticPolicy>,
}

impl PluginGrants {
    /// Start building a plugin map.
    pub fn builder() -> PluginGrantsBuilder {
        PluginGrantsBuilder::default()
    }

    /// A map with no plugins.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The policy registered for `origin`, if any.
    ///
    /// `file:/opt/plugins/a.jar` and `/opt/plugins/a.jar` name the same plugin.
    pub fn get(&self, origin: &Origin) -> Option<&StaticPolicy> {
        self.by_origin.get(origin.file())
    }

    pub fn len(&self) -> usize {
        self.by_origin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }
}

/// Builder for [`PluginGrants`].
#[derive(Debug, Default)]
pub struct PluginGrantsBuilder {
    by_origin: HashMap<String, StaticPolicy>,
}

impl PluginGrantsBuilder {
    /// Register an already built policy for `origin`.
    pub fn insert(mut self, origin: impl Into<Origin>, policy: StaticPolicy) -> Result<Self> {
        let origin = origin.into();
        let key = origin.file().to_string();
        if self.by_origin.contains_key(&key) {
            return Err(PolicyError::DuplicatePlugin(origin));
        }
        tracing::debug!(
            "plugin {}: registered policy {} with {} permissions",
            origin,
            policy.name(),
            policy.permission_count()
        );
        self.by_origin.insert(key, policy);
        Ok(self)
    }

    /// Read the policy at `location` and register it for `origin`.
    ///
    /// `classpath` is the plugin's own classpath; its jars are exposed as
    /// `${codebase.<jar>}` within the plugin's document.
    pub fn load(
        self,
        origin: impl Into<Origin>,
        location: &PolicyLocation,
        classpath: &[Origin],
        properties: &PolicyProperties,
    ) -> Result<Self> {
        let policy = StaticPolicy::read(location, classpath, properties)?;
        self.insert(origin, policy)
    }

    /// Register an already parsed document for `origin`.
    pub fn load_document(
        self,
        origin: impl Into<Origin>,
        document: &PolicyDocument,
        properties: &PolicyProperties,
    ) -> Result<Self> {
        let origin = origin.into();
        let policy = StaticPolicy::from_document(origin.as_str(), document, properties)?;
        self.insert(origin, policy)
    }

    pub fn build(self) -> PluginGrants {
        PluginGrants {
            by_origin: self.by_origin,
        }
    }
}
