//! Policy documents: the on-disk form of a static policy.
//!
//! ```json
//! {
//!   "grants": [
//!     { "codebase": "${codebase.netty-transport.jar}",
//!       "permissions": [ { "type": "socket", "name": "*", "actions": "connect,accept" } ] },
//!     { "permissions": [ { "type": "runtime", "name": "getClassLoader" } ] }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use gatekeeper_core::PermissionSpec;
use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Baseline policy shipped with the crate.
pub const TEMPLATE_POLICY: &str = include_str!("../policy/security.json");

/// Sandbox policy for untrusted scripts shipped with the crate.
pub const UNTRUSTED_POLICY: &str = include_str!("../policy/untrusted.json");

/// A parsed, unexpanded policy document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default)]
    pub grants: Vec<GrantEntry>,
}

/// One grant block.
///
/// Without a codebase the permissions apply to all code. With one they apply
/// only to code whose origin the codebase covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codebase: Option<String>,

    #[serde(default)]
    pub permissions: Vec<PermissionSpec>,
}

impl PolicyDocument {
    /// Parse a document. `policy` names it in errors.
    pub fn from_json_str(policy: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| PolicyError::Parse {
            policy: policy.to_string(),
            source,
        })
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&path.display().to_string(), &json)
    }
}

/// Where a policy document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyLocation {
    /// Compiled into the binary.
    Embedded {
        name: &'static str,
        contents: &'static str,
    },
    /// A file on disk.
    File(PathBuf),
}

impl PolicyLocation {
    /// The embedded baseline policy.
    pub fn template() -> Self {
        PolicyLocation::Embedded {
            name: "security.json",
            contents: TEMPLATE_POLICY,
        }
    }

    /// The embedded sandbox policy.
    pub fn untrusted() -> Self {
        PolicyLocation::Embedded {
            name: "untrusted.json",
            contents: UNTRUSTED_POLICY,
        }
    }

    /// Name used in logs and errors.
    pub fn name(&self) -> String {
        match self {
            PolicyLocation::Embedded { name, .. } => (*name).to_string(),
            PolicyLocation::File(path) => path.display().to_string(),
        }
    }

    /// Read and parse the document.
    pub fn read(&self) -> Result<PolicyDocument> {
        match self {
            PolicyLocation::Embedded { name, contents } => {
                PolicyDocument::from_json_str(name, contents)
            }
            PolicyLocation::File(path) => PolicyDocument::from_file(path),
        }
    }
}
