//! The dynamic permission collection.
//!
//! Owned by the surrounding process and shared with the engine. The process
//! appends permissions over its lifetime; the engine only ever reads.

use std::sync::RwLock;

use gatekeeper_core::{Permission, Permissions};

/// Thread-safe, append-only permission collection.
///
/// Reads take a shared lock, so concurrent checks do not contend with each
/// other. A poisoned lock is logged and reads as "not granted".
#[derive(Debug, Default)]
pub struct DynamicPermissions {
    inner: RwLock<Permissions>,
}

impl DynamicPermissions {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a permission, visible to every check that starts afterwards.
    pub fn add(&self, permission: Permission) {
        match self.inner.write() {
            Ok(mut permissions) => permissions.add(permission),
            Err(e) => {
                tracing::error!("dynamic permissions: lock poisoned on add: {e}");
            }
        }
    }

    /// Check if any held permission implies `permission`.
    pub fn implies(&self, permission: &Permission) -> bool {
        match self.inner.read() {
            Ok(permissions) => permissions.implies(permission),
            Err(e) => {
                tracing::error!("dynamic permissions: lock poisoned on implies: {e}");
                false
            }
        }
    }

    /// Number of permissions held.
    pub fn len(&self) -> usize {
        self.inner.read().map(|p| p.len()).unwrap_or(0)
    }

    /// True if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the current contents.
    pub fn snapshot(&self) -> Permissions {
        match self.inner.read() {
            Ok(permissions) => permissions.clone(),
            Err(e) => {
                tracing::error!("dynamic permissions: lock poisoned on snapshot: {e}");
                Permissions::new()
            }
        }
    }
}

impl From<Permissions> for DynamicPermissions {
    fn from(permissions: Permissions) -> Self {
        Self {
            inner: RwLock::new(permissions),
        }
    }
}

impl FromIterator<Permission> for DynamicPermissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Permissions>())
    }
}
