//! Static policies built from policy documents.
//!
//! The template, untrusted and plugin sources are all static policies. They
//! are read once, expanded against their properties and never change.

use gatekeeper_core::{Domain, Origin, Permission, Permissions};

use crate::codebase::Codebase;
use crate::document::{PolicyDocument, PolicyLocation};
use crate::error::{PlaceholderError, PolicyError, Result};
use crate::properties::{PolicyProperties, CODEBASE_PREFIX};

/// A grant block after expansion.
#[derive(Debug, Clone)]
pub struct ScopedGrant {
    codebase: Option<Codebase>,
    permissions: Permissions,
}

impl ScopedGrant {
    /// The codebase this grant is limited to, if any.
    pub fn codebase(&self) -> Option<&Codebase> {
        self.codebase.as_ref()
    }

    /// The granted permissions.
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    fn applies_to(&self, location: Option<&Origin>) -> bool {
        match &self.codebase {
            None => true,
            Some(codebase) => location.is_some_and(|origin| codebase.covers(origin)),
        }
    }
}

/// An immutable, file-declared policy.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    name: String,
    grants: Vec<ScopedGrant>,
}

impl StaticPolicy {
    /// Read a policy, exposing each classpath entry as `${codebase.<jar>}`.
    pub fn read(
        location: &PolicyLocation,
        classpath: &[Origin],
        properties: &PolicyProperties,
    ) -> Result<Self> {
        let document = location.read()?;
        let properties = properties.clone().with_classpath(classpath)?;
        Self::from_document(&location.name(), &document, &properties)
    }

    /// Expand and validate a parsed document.
    ///
    /// A grant scoped to `${codebase.<jar>}` for a jar that is not on the
    /// classpath is dropped: the code it would cover is not present. Any
    /// other unknown placeholder is an error.
    pub fn from_document(
        name: &str,
        document: &PolicyDocument,
        properties: &PolicyProperties,
    ) -> Result<Self> {
        let placeholder = |source: PlaceholderError| PolicyError::Placeholder {
            policy: name.to_string(),
            source,
        };

        let mut grants = Vec::with_capacity(document.grants.len());
        for entry in &document.grants {
            let codebase = match &entry.codebase {
                None => None,
                Some(raw) => match properties.expand(raw) {
                    Ok(expanded) => Some(Codebase::parse(&expanded).ok_or_else(|| {
                        PolicyError::InvalidCodebase {
                            policy: name.to_string(),
                            codebase: expanded.clone(),
                        }
                    })?),
                    Err(PlaceholderError::Unknown(property))
                        if property.starts_with(CODEBASE_PREFIX) =>
                    {
                        tracing::debug!(
                            "policy {}: skipping grant for {}, not on the classpath",
                            name,
                            property
                        );
                        continue;
                    }
                    Err(e) => return Err(placeholder(e)),
                },
            };

            let mut permissions = Permissions::new();
            for spec in &entry.permissions {
                let mut spec = spec.clone();
                spec.name = properties.expand(&spec.name).map_err(placeholder)?;
                let permission =
                    Permission::try_from(spec).map_err(|source| PolicyError::Permission {
                        policy: name.to_string(),
                        source,
                    })?;
                permissions.add(permission);
            }

            grants.push(ScopedGrant {
                codebase,
                permissions,
            });
        }

        Ok(Self {
            name: name.to_string(),
            grants,
        })
    }

    /// A policy granting `permissions` to all code.
    pub fn from_permissions(name: &str, permissions: Permissions) -> Self {
        Self {
            name: name.to_string(),
            grants: vec![ScopedGrant {
                codebase: None,
                permissions,
            }],
        }
    }

    /// A policy granting nothing.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            grants: Vec::new(),
        }
    }

    /// Name of the document this policy was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expanded grant blocks.
    pub fn grants(&self) -> &[ScopedGrant] {
        &self.grants
    }

    /// Total number of permissions across all grant blocks.
    pub fn permission_count(&self) -> usize {
        self.grants.iter().map(|g| g.permissions.len()).sum()
    }

    /// Check if this policy grants `permission` to `domain`.
    pub fn implies(&self, domain: &Domain, permission: &Permission) -> bool {
        let location = domain.location();
        self.grants
            .iter()
            .any(|grant| grant.applies_to(location) && grant.permissions.implies(permission))
    }
}
