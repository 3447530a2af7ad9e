//! The authorization engine.
//!
//! The engine owns every permission source and answers one question: does
//! this domain hold this permission. Sources are consulted in a fixed order:
//!
//! 1. Domains without a code source, or whose code source has no location,
//!    are denied.
//! 2. Sandboxed script code is answered by the untrusted policy alone.
//! 3. A plugin's own policy can grant to that plugin's code.
//! 4. Otherwise the template, then the dynamic collection, then the system
//!    policy. The first grant wins.

use std::fmt;
use std::sync::Arc;

use gatekeeper_core::{Domain, OriginResolution, Permission};
use gatekeeper_policy::{
    BadDefault, DynamicPermissions, PermissionSource, PluginGrants, SourceKind, StaticPolicy,
    SystemPolicy, SystemSource, Verdict,
};

use crate::config::EngineConfig;
use crate::error::Result;

/// Why a permission was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The domain has no code source.
    NoCodeSource,
    /// The code source has no location.
    NoLocation,
    /// Sandboxed code outside the untrusted grant set.
    Sandboxed,
    /// No earlier source granted it and the request matched a bad default.
    /// The platform policy is not consulted.
    Blacklisted(&'static BadDefault),
    /// No source granted it.
    NoGrant,
}

/// The outcome of a check, with the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted(SourceKind),
    Denied(DenyReason),
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted(_))
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NoCodeSource => f.write_str("no code source"),
            DenyReason::NoLocation => f.write_str("code source has no location"),
            DenyReason::Sandboxed => f.write_str("not granted to sandboxed code"),
            DenyReason::Blacklisted(entry) => write!(f, "bad default {}", entry.name()),
            DenyReason::NoGrant => f.write_str("no source grants it"),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Granted(source) => write!(f, "granted by {}", source),
            Decision::Denied(reason) => write!(f, "denied: {}", reason),
        }
    }
}

/// The resolved sources an engine is built from.
#[derive(Debug)]
pub struct EngineSources {
    pub template: StaticPolicy,
    pub untrusted: StaticPolicy,
    pub plugins: PluginGrants,
    pub dynamic: Arc<DynamicPermissions>,
    pub system: SystemSource,
}

/// The authorization engine.
///
/// Immutable after construction apart from the shared dynamic collection,
/// so one engine can serve concurrent checks from any number of threads.
#[derive(Debug)]
pub struct Engine {
    template: StaticPolicy,
    untrusted: StaticPolicy,
    plugins: PluginGrants,
    dynamic: Arc<DynamicPermissions>,
    system: SystemSource,
}

impl Engine {
    /// Build an engine from configuration.
    ///
    /// Reads both policy documents. Any failure to read, parse or expand
    /// them is returned; there is no fallback to an empty policy.
    pub fn new(
        config: &EngineConfig,
        dynamic: Arc<DynamicPermissions>,
        plugins: PluginGrants,
        system: Arc<dyn SystemPolicy>,
    ) -> Result<Self> {
        let properties = config.policy_properties();
        let template = StaticPolicy::read(&config.template_location(), &config.classpath, &properties)?;
        let untrusted = StaticPolicy::read(&config.untrusted_location(), &[], &properties)?;

        Ok(Self::from_sources(EngineSources {
            template,
            untrusted,
            plugins,
            dynamic,
            system: SystemSource::new(system, config.filter_bad_defaults),
        }))
    }

    /// Build an engine from already resolved sources.
    pub fn from_sources(sources: EngineSources) -> Self {
        tracing::info!(
            "engine ready: template {} ({} permissions), untrusted {} ({} permissions), {} plugins, {} dynamic, bad defaults {}",
            sources.template.name(),
            sources.template.permission_count(),
            sources.untrusted.name(),
            sources.untrusted.permission_count(),
            sources.plugins.len(),
            sources.dynamic.len(),
            if sources.system.is_filtered() { "filtered" } else { "allowed" },
        );

        Self {
            template: sources.template,
            untrusted: sources.untrusted,
            plugins: sources.plugins,
            dynamic: sources.dynamic,
            system: sources.system,
        }
    }

    /// The shared dynamic collection.
    pub fn dynamic(&self) -> &Arc<DynamicPermissions> {
        &self.dynamic
    }

    pub fn plugins(&self) -> &PluginGrants {
        &self.plugins
    }

    /// True if bad defaults of the system policy are denied.
    pub fn filters_bad_defaults(&self) -> bool {
        self.system.is_filtered()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decisions
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide whether `domain` holds `permission`.
    ///
    /// Fails only when the system policy fails; its error is returned as is.
    pub fn decide(&self, domain: &Domain, permission: &Permission) -> Result<bool> {
        Ok(self.explain(domain, permission)?.is_granted())
    }

    /// Decide whether `domain` holds `permission`, and say which step decided.
    pub fn explain(&self, domain: &Domain, permission: &Permission) -> Result<Decision> {
        let origin = match domain.resolve_origin() {
            OriginResolution::NoCodeSource => {
                return Ok(denied(permission, DenyReason::NoCodeSource));
            }
            OriginResolution::NoLocation => {
                return Ok(denied(permission, DenyReason::NoLocation));
            }
            OriginResolution::Located(origin) => origin,
        };

        if origin.is_sandbox() {
            let source = PermissionSource::Untrusted(&self.untrusted);
            return Ok(match source.grants(domain, permission)? {
                Verdict::Granted => granted(permission, source.kind()),
                _ => denied(permission, DenyReason::Sandboxed),
            });
        }

        if let Some(plugin) = self.plugins.get(origin) {
            let source = PermissionSource::Plugin(plugin);
            if source.grants(domain, permission)?.is_granted() {
                return Ok(granted(permission, source.kind()));
            }
        }

        let mut blacklisted = None;
        for source in [
            PermissionSource::Template(&self.template),
            PermissionSource::Dynamic(self.dynamic.as_ref()),
            PermissionSource::System(&self.system),
        ] {
            match source.grants(domain, permission)? {
                Verdict::Granted => return Ok(granted(permission, source.kind())),
                Verdict::Denied => {}
                Verdict::Blacklisted(entry) => blacklisted = Some(entry),
            }
        }

        let reason = match blacklisted {
            Some(entry) => DenyReason::Blacklisted(entry),
            None => DenyReason::NoGrant,
        };
        Ok(denied(permission, reason))
    }
}

fn granted(permission: &Permission, source: SourceKind) -> Decision {
    tracing::trace!("{} granted by {}", permission, source);
    Decision::Granted(source)
}

fn denied(permission: &Permission, reason: DenyReason) -> Decision {
    tracing::debug!("{} denied: {}", permission, reason);
    Decision::Denied(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeeper_core::{CodeSource, Permissions};
    use gatekeeper_policy::DefaultSystemPolicy;

    fn engine(filter_bad_defaults: bool) -> Engine {
        Engine::from_sources(EngineSources {
            template: StaticPolicy::from_permissions(
                "template",
                Permissions::from_iter([Permission::runtime("setContextClassLoader")]),
            ),
            untrusted: StaticPolicy::from_permissions(
                "untrusted",
                Permissions::from_iter([Permission::runtime("getClassLoader")]),
            ),
            plugins: PluginGrants::empty(),
            dynamic: Arc::new(DynamicPermissions::new()),
            system: SystemSource::new(Arc::new(DefaultSystemPolicy::new()), filter_bad_defaults),
        })
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_missing_code_source_and_location_are_distinct() {
        let engine = engine(true);
        let wanted = Permission::runtime("setContextClassLoader");

        assert_eq!(
            engine.explain(&Domain::without_code_source(), &wanted).unwrap(),
            Decision::Denied(DenyReason::NoCodeSource)
        );
        assert_eq!(
            engine
                .explain(&Domain::new(CodeSource::unlocated()), &wanted)
                .unwrap(),
            Decision::Denied(DenyReason::NoLocation)
        );
    }

    #[test]
    fn test_blacklist_reason_names_entry() {
        let decision = engine(true)
            .explain(&Domain::from_origin("/opt/gk/lib/core.jar"), &Permission::runtime("stopThread"))
            .unwrap();
        match decision {
            Decision::Denied(DenyReason::Blacklisted(entry)) => assert_eq!(entry.name(), "stop_thread"),
            other => panic!("unexpected decision: {other}"),
        }
        assert_eq!(decision.to_string(), "denied: bad default stop_thread");
    }

    #[test]
    fn test_unfiltered_system_grants_bad_defaults() {
        let engine = engine(false);
        assert!(!engine.filters_bad_defaults());
        assert_eq!(
            engine
                .explain(&Domain::from_origin("/opt/gk/lib/core.jar"), &Permission::runtime("stopThread"))
                .unwrap(),
            Decision::Granted(SourceKind::System)
        );
    }

    #[test]
    fn test_sandbox_reason() {
        let decision = engine(true)
            .explain(&Domain::sandbox(), &Permission::runtime("setContextClassLoader"))
            .unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::Sandboxed));
    }
}
