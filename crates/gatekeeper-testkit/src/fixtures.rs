//! Test fixtures and helpers.
//!
//! Common setup code for engine tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gatekeeper::{Engine, EngineSources};
use gatekeeper_core::{CodeSource, Domain, Origin, Permission, Permissions};
use gatekeeper_policy::{
    DefaultSystemPolicy, DynamicPermissions, PluginGrants, PolicyDocument, StaticPolicy,
    SystemPolicy, SystemPolicyError, SystemSource,
};
use tempfile::TempDir;

/// Origin of an ordinary library jar.
pub const CORE_JAR: &str = "/opt/gatekeeper/lib/gatekeeper-core.jar";

/// Origin of a plugin jar.
pub const PLUGIN_JAR: &str = "/plugins/foo.jar";

/// Domain for code loaded from `origin`.
pub fn domain(origin: &str) -> Domain {
    Domain::from_origin(origin)
}

/// Domain for sandboxed script code.
pub fn sandbox() -> Domain {
    Domain::sandbox()
}

/// Domain whose code source has no location.
pub fn unlocated() -> Domain {
    Domain::new(CodeSource::unlocated())
}

/// Domain with no code source at all.
pub fn no_code_source() -> Domain {
    Domain::without_code_source()
}

/// Install a test-writer subscriber at trace level. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

/// A platform policy that records how often it is asked.
#[derive(Debug, Default)]
pub struct RecordingSystemPolicy {
    permissions: Permissions,
    calls: AtomicUsize,
}

impl RecordingSystemPolicy {
    /// Grant exactly `permissions`.
    pub fn new(permissions: Permissions) -> Self {
        Self {
            permissions,
            calls: AtomicUsize::new(0),
        }
    }

    /// The platform defaults.
    pub fn defaults() -> Self {
        Self::new(DefaultSystemPolicy::new().permissions().clone())
    }

    /// Number of checks that reached this policy.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SystemPolicy for RecordingSystemPolicy {
    fn implies(&self, _domain: &Domain, permission: &Permission) -> Result<bool, SystemPolicyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.permissions.implies(permission))
    }
}

/// A platform policy that always fails.
#[derive(Debug, Default)]
pub struct FailingSystemPolicy;

impl SystemPolicy for FailingSystemPolicy {
    fn implies(&self, _domain: &Domain, _permission: &Permission) -> Result<bool, SystemPolicyError> {
        Err(SystemPolicyError::Evaluation(Box::new(std::io::Error::other(
            "platform policy store unreadable",
        ))))
    }
}

/// Builder for an engine over in-memory sources.
pub struct EngineFixture {
    template: Permissions,
    untrusted: Permissions,
    plugins: Vec<(Origin, Permissions)>,
    dynamic: Arc<DynamicPermissions>,
    system: Arc<dyn SystemPolicy>,
    filter_bad_defaults: bool,
}

impl EngineFixture {
    /// Empty sources, the default platform policy, bad defaults filtered.
    pub fn new() -> Self {
        Self {
            template: Permissions::new(),
            untrusted: Permissions::new(),
            plugins: Vec::new(),
            dynamic: Arc::new(DynamicPermissions::new()),
            system: Arc::new(DefaultSystemPolicy::new()),
            filter_bad_defaults: true,
        }
    }

    pub fn template(mut self, permission: Permission) -> Self {
        self.template.add(permission);
        self
    }

    pub fn untrusted(mut self, permission: Permission) -> Self {
        self.untrusted.add(permission);
        self
    }

    /// Grant `permission` to the plugin at `origin`.
    pub fn plugin(mut self, origin: &str, permission: Permission) -> Self {
        let origin = Origin::new(origin);
        match self.plugins.iter_mut().find(|(o, _)| *o == origin) {
            Some((_, permissions)) => permissions.add(permission),
            None => self.plugins.push((origin, Permissions::from_iter([permission]))),
        }
        self
    }

    pub fn dynamic(mut self, permission: Permission) -> Self {
        self.dynamic.add(permission);
        self
    }

    /// Share an existing dynamic collection.
    pub fn shared_dynamic(mut self, dynamic: Arc<DynamicPermissions>) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn system(mut self, system: Arc<dyn SystemPolicy>) -> Self {
        self.system = system;
        self
    }

    pub fn filter_bad_defaults(mut self, filter: bool) -> Self {
        self.filter_bad_defaults = filter;
        self
    }

    /// Build the engine.
    ///
    /// # Panics
    ///
    /// If the same plugin origin was spelled two different ways.
    pub fn build(self) -> Engine {
        let mut plugins = PluginGrants::builder();
        for (origin, permissions) in self.plugins {
            let policy = StaticPolicy::from_permissions(origin.as_str(), permissions);
            plugins = plugins
                .insert(origin, policy)
                .expect("fixture plugin origins are distinct");
        }

        Engine::from_sources(EngineSources {
            template: StaticPolicy::from_permissions("template", self.template),
            untrusted: StaticPolicy::from_permissions("untrusted", self.untrusted),
            plugins: plugins.build(),
            dynamic: self.dynamic,
            system: SystemSource::new(self.system, self.filter_bad_defaults),
        })
    }
}

impl Default for EngineFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A temporary directory of policy documents.
pub struct PolicyDir {
    dir: TempDir,
}

impl PolicyDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write raw JSON to `name` and return its path.
    pub fn write(&self, name: &str, json: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, json).expect("write policy document");
        path
    }

    /// Serialize `document` to `name` and return its path.
    pub fn write_document(&self, name: &str, document: &PolicyDocument) -> PathBuf {
        let json = serde_json::to_string_pretty(document).expect("serialize policy document");
        self.write(name, &json)
    }
}

impl Default for PolicyDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_routes_plugin_grants() {
        let engine = EngineFixture::new()
            .plugin(PLUGIN_JAR, Permission::runtime("a"))
            .plugin(PLUGIN_JAR, Permission::runtime("b"))
            .build();

        assert_eq!(engine.plugins().len(), 1);
        assert!(engine.decide(&domain(PLUGIN_JAR), &Permission::runtime("b")).unwrap());
        assert!(!engine.decide(&domain(CORE_JAR), &Permission::runtime("b")).unwrap());
    }

    #[test]
    fn test_recording_policy_counts() {
        let system = Arc::new(RecordingSystemPolicy::defaults());
        let engine = EngineFixture::new().system(system.clone()).build();

        engine
            .decide(&domain(CORE_JAR), &Permission::runtime("modifyThread"))
            .unwrap();
        assert_eq!(system.calls(), 1);
    }

    #[test]
    fn test_policy_dir_round_trips_documents() {
        let dir = PolicyDir::new();
        let document = PolicyDocument::from_json_str(
            "inline",
            r#"{"grants":[{"permissions":[{"type":"runtime","name":"getClassLoader"}]}]}"#,
        )
        .unwrap();

        let path = dir.write_document("inline.json", &document);
        assert_eq!(PolicyDocument::from_file(&path).unwrap(), document);
    }
}
