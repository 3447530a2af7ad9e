//! Permission collections.

use crate::permission::Permission;

/// An append-only set of granted permissions.
///
/// The only question a collection answers is whether some member implies a
/// requested permission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    entries: Vec<Permission>,
    /// Set once `Permission::All` has been added.
    all: bool,
}

impl Permissions {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a permission. Exact duplicates are ignored.
    pub fn add(&mut self, permission: Permission) {
        if self.entries.contains(&permission) {
            return;
        }
        if permission == Permission::All {
            self.all = true;
        }
        self.entries.push(permission);
    }

    /// Check if any member implies `permission`.
    pub fn implies(&self, permission: &Permission) -> bool {
        self.all || self.entries.iter().any(|granted| granted.implies(permission))
    }

    /// Number of distinct permissions held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been granted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the held permissions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Permission> {
        self.entries.iter()
    }
}

impl Extend<Permission> for Permissions {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        for permission in iter {
            self.add(permission);
        }
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut permissions = Self::new();
        permissions.extend(iter);
        permissions
    }
}

impl<'a> IntoIterator for &'a Permissions {
    type Item = &'a Permission;
    type IntoIter = std::slice::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
