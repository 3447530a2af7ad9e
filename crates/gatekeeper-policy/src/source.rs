//! The closed set of permission sources.
//!
//! The engine consults sources in a fixed order. Keeping them a closed enum
//! makes that order visible at the call site and lets a decision report
//! which source produced it.

use std::fmt;

use gatekeeper_core::{Domain, Permission};

use crate::blacklist::BadDefault;
use crate::dynamic::DynamicPermissions;
use crate::static_policy::StaticPolicy;
use crate::system::{SystemPolicyError, SystemSource};

/// Which kind of source answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Untrusted,
    Plugin,
    Template,
    Dynamic,
    System,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Untrusted => "untrusted",
            SourceKind::Plugin => "plugin",
            SourceKind::Template => "template",
            SourceKind::Dynamic => "dynamic",
            SourceKind::System => "system",
        })
    }
}

/// A single source's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Granted,
    Denied,
    /// Denied by the bad default filter.
    Blacklisted(&'static BadDefault),
}

impl Verdict {
    pub fn from_granted(granted: bool) -> Self {
        if granted {
            Verdict::Granted
        } else {
            Verdict::Denied
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Verdict::Granted)
    }
}

/// A borrowed permission source.
#[derive(Debug, Clone, Copy)]
pub enum PermissionSource<'a> {
    Untrusted(&'a StaticPolicy),
    Plugin(&'a StaticPolicy),
    Template(&'a StaticPolicy),
    Dynamic(&'a DynamicPermissions),
    System(&'a SystemSource),
}

impl PermissionSource<'_> {
    /// The kind of this source.
    pub fn kind(&self) -> SourceKind {
        match self {
            PermissionSource::Untrusted(_) => SourceKind::Untrusted,
            PermissionSource::Plugin(_) => SourceKind::Plugin,
            PermissionSource::Template(_) => SourceKind::Template,
            PermissionSource::Dynamic(_) => SourceKind::Dynamic,
            PermissionSource::System(_) => SourceKind::System,
        }
    }

    /// Ask this source about `permission` for `domain`.
    ///
    /// Only the system source can fail.
    pub fn grants(
        &self,
        domain: &Domain,
        permission: &Permission,
    ) -> Result<Verdict, SystemPolicyError> {
        match self {
            PermissionSource::Untrusted(policy)
            | PermissionSource::Plugin(policy)
            | PermissionSource::Template(policy) => {
                Ok(Verdict::from_granted(policy.implies(domain, permission)))
            }
            PermissionSource::Dynamic(dynamic) => {
                Ok(Verdict::from_granted(dynamic.implies(permission)))
            }
            PermissionSource::System(system) => system.check(domain, permission),
        }
    }
}
