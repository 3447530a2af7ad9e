//! # Gatekeeper Policy
//!
//! The permission sources consulted by the Gatekeeper engine.
//!
//! ## Sources
//!
//! - [`StaticPolicy`] - Immutable grants read from a policy document. The
//!   template, untrusted and per-plugin policies are all static.
//! - [`DynamicPermissions`] - Process-owned grants appended at runtime
//! - [`SystemSource`] - The platform's own policy, optionally filtered
//!   against the [`bad_defaults`] list
//!
//! ## Policy Documents
//!
//! Documents are JSON. Each grant block may be scoped to a codebase, and
//! names and codebases may use `${...}` placeholders:
//!
//! ```rust
//! use gatekeeper_core::{Domain, Origin, Permission};
//! use gatekeeper_policy::{PolicyDocument, PolicyProperties, StaticPolicy};
//!
//! let document = PolicyDocument::from_json_str("inline", r#"{
//!     "grants": [
//!         { "codebase": "${codebase.netty.jar}",
//!           "permissions": [ { "type": "socket", "name": "*", "actions": "connect" } ] }
//!     ]
//! }"#).unwrap();
//!
//! let properties = PolicyProperties::new()
//!     .with_classpath(&[Origin::new("/opt/lib/netty.jar")])
//!     .unwrap();
//! let policy = StaticPolicy::from_document("inline", &document, &properties).unwrap();
//!
//! let connect = Permission::socket("10.0.0.1:9300", "connect").unwrap();
//! assert!(policy.implies(&Domain::from_origin("/opt/lib/netty.jar"), &connect));
//! assert!(!policy.implies(&Domain::from_origin("/opt/lib/core.jar"), &connect));
//! ```

pub mod blacklist;
pub mod classpath;
pub mod codebase;
pub mod document;
pub mod dynamic;
pub mod error;
pub mod plugins;
pub mod properties;
pub mod source;
pub mod static_policy;
pub mod system;

pub use blacklist::{bad_defaults, find_bad_default, BadDefault};
pub use classpath::parse_classpath;
pub use codebase::Codebase;
pub use document::{GrantEntry, PolicyDocument, PolicyLocation};
pub use dynamic::DynamicPermissions;
pub use error::{PlaceholderError, PolicyError, Result};
pub use plugins::{PluginGrants, PluginGrantsBuilder};
pub use properties::PolicyProperties;
pub use source::{PermissionSource, SourceKind, Verdict};
pub use static_policy::{ScopedGrant, StaticPolicy};
pub use system::{
    DefaultSystemPolicy, FilteredSystemPolicy, SystemPolicy, SystemPolicyError, SystemSource,
};
