//! The platform's ambient policy, and the filter placed in front of it.

use std::fmt;
use std::sync::Arc;

use gatekeeper_core::{Domain, Permission, Permissions};
use thiserror::Error;

use crate::blacklist::find_bad_default;
use crate::source::Verdict;

/// Failure reported by the ambient platform policy.
///
/// The engine never turns this into a grant or a denial; it is handed back
/// to the caller as is.
#[derive(Debug, Error)]
pub enum SystemPolicyError {
    #[error("system policy unavailable: {0}")]
    Unavailable(String),

    #[error("system policy evaluation failed: {0}")]
    Evaluation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The platform's default policy.
pub trait SystemPolicy: Send + Sync {
    /// Check if the platform grants `permission` to `domain`.
    fn implies(&self, domain: &Domain, permission: &Permission)
        -> Result<bool, SystemPolicyError>;
}

/// The platform defaults as historically shipped.
///
/// Grants every domain read access to a handful of standard properties, and
/// also the four permissions listed in [`crate::blacklist`].
#[derive(Debug, Clone)]
pub struct DefaultSystemPolicy {
    permissions: Permissions,
}

const READABLE_PROPERTIES: &[&str] = &[
    "java.version",
    "java.vendor",
    "java.vendor.url",
    "java.class.version",
    "java.specification.version",
    "java.vm.specification.version",
    "java.vm.version",
    "java.vm.vendor",
    "java.vm.name",
    "os.name",
    "os.version",
    "os.arch",
    "file.separator",
    "path.separator",
    "line.separator",
];

impl DefaultSystemPolicy {
    /// The historical platform defaults.
    pub fn new() -> Self {
        let mut permissions: Permissions = crate::blacklist::bad_defaults()
            .iter()
            .map(|entry| entry.permission().clone())
            .collect();
        permissions.extend(READABLE_PROPERTIES.iter().map(|name| Permission::Property {
            name: (*name).to_string(),
            actions: gatekeeper_core::PropertyActions::READ,
        }));
        Self { permissions }
    }

    /// A platform policy granting exactly `permissions` to every domain.
    pub fn with_permissions(permissions: Permissions) -> Self {
        Self { permissions }
    }

    /// The granted permissions.
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}

impl Default for DefaultSystemPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPolicy for DefaultSystemPolicy {
    fn implies(&self, _domain: &Domain, permission: &Permission) -> Result<bool, SystemPolicyError> {
        Ok(self.permissions.implies(permission))
    }
}

/// The platform policy with bad defaults removed.
#[derive(Clone)]
pub struct FilteredSystemPolicy {
    delegate: Arc<dyn SystemPolicy>,
}

impl FilteredSystemPolicy {
    /// Wrap `delegate`.
    pub fn new(delegate: Arc<dyn SystemPolicy>) -> Self {
        Self { delegate }
    }

    /// Check `permission`, reporting which bad default denied it, if any.
    ///
    /// A blacklisted request is denied without consulting the delegate.
    pub fn check(&self, domain: &Domain, permission: &Permission) -> Result<Verdict, SystemPolicyError> {
        if let Some(entry) = find_bad_default(permission) {
            tracing::debug!("system policy: {} denied as bad default {}", permission, entry.name());
            return Ok(Verdict::Blacklisted(entry));
        }
        self.delegate
            .implies(domain, permission)
            .map(Verdict::from_granted)
    }
}

impl SystemPolicy for FilteredSystemPolicy {
    fn implies(&self, domain: &Domain, permission: &Permission) -> Result<bool, SystemPolicyError> {
        self.check(domain, permission).map(|verdict| verdict.is_granted())
    }
}

impl fmt::Debug for FilteredSystemPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredSystemPolicy").finish_non_exhaustive()
    }
}

/// The system source as configured: filtered or passed through.
#[derive(Clone)]
pub enum SystemSource {
    Filtered(FilteredSystemPolicy),
    Unfiltered(Arc<dyn SystemPolicy>),
}

impl SystemSource {
    /// Wrap `delegate`, filtering bad defaults when asked to.
    pub fn new(delegate: Arc<dyn SystemPolicy>, filter_bad_defaults: bool) -> Self {
        if filter_bad_defaults {
            SystemSource::Filtered(FilteredSystemPolicy::new(delegate))
        } else {
            SystemSource::Unfiltered(delegate)
        }
    }

    /// True if bad defaults are filtered.
    pub fn is_filtered(&self) -> bool {
        matches!(self, SystemSource::Filtered(_))
    }

    /// Check `permission` against the platform policy.
    pub fn check(&self, domain: &Domain, permission: &Permission) -> Result<Verdict, SystemPolicyError> {
        match self {
            SystemSource::Filtered(filtered) => filtered.check(domain, permission),
            SystemSource::Unfiltered(delegate) => delegate
                .implies(domain, permission)
                .map(Verdict::from_granted),
        }
    }
}

impl fmt::Debug for SystemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemSource::Filtered(_) => f.write_str("SystemSource::Filtered"),
            SystemSource::Unfiltered(_) => f.write_str("SystemSource::Unfiltered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Grants everything and counts how often it was asked.
    #[derive(Default)]
    struct Permissive {
        calls: AtomicUsize,
    }

    impl SystemPolicy for Permissive {
        fn implies(&self, _: &Domain, _: &Permission) -> Result<bool, SystemPolicyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    struct Broken;

    impl SystemPolicy for Broken {
        fn implies(&self, _: &Domain, _: &Permission) -> Result<bool, SystemPolicyError> {
            Err(SystemPolicyError::Unavailable("policy file vanished".into()))
        }
    }

    fn domain() -> Domain {
        Domain::from_origin("/opt/gk/lib/core.jar")
    }

    #[test]
    fn test_default_policy_grants_bad_defaults() {
        let policy = DefaultSystemPolicy::new();
        assert!(policy
            .implies(&domain(), &Permission::runtime("stopThread"))
            .unwrap());
        assert!(policy
            .implies(&domain(), &Permission::socket("localhost:0", "listen").unwrap())
            .unwrap());
        assert!(policy
            .implies(&domain(), &Permission::property("os.name", "read").unwrap())
            .unwrap());
    }

    #[test]
    fn test_filter_denies_without_consulting_delegate() {
        let delegate = Arc::new(Permissive::default());
        let filtered = FilteredSystemPolicy::new(delegate.clone());

        let verdict = filtered
            .check(&domain(), &Permission::runtime("stopThread"))
            .unwrap();
        assert!(matches!(verdict, Verdict::Blacklisted(entry) if entry.name() == "stop_thread"));
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_filter_passes_everything_else_through() {
        let delegate = Arc::new(Permissive::default());
        let filtered = FilteredSystemPolicy::new(delegate.clone());

        assert!(filtered
            .implies(&domain(), &Permission::runtime("modifyThread"))
            .unwrap());
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unfiltered_source_keeps_bad_defaults() {
        let source = SystemSource::new(Arc::new(DefaultSystemPolicy::new()), false);
        assert!(!source.is_filtered());
        assert_eq!(
            source
                .check(&domain(), &Permission::runtime("stopThread"))
                .unwrap(),
            Verdict::Granted
        );
    }

    #[test]
    fn test_delegate_errors_propagate() {
        let filtered = SystemSource::new(Arc::new(Broken), true);
        let err = filtered
            .check(&domain(), &Permission::runtime("modifyThread"))
            .unwrap_err();
        assert!(matches!(err, SystemPolicyError::Unavailable(_)));

        // blacklisted requests never reach the delegate
        assert!(filtered
            .check(&domain(), &Permission::runtime("stopThread"))
            .is_ok());
    }
}
