//! # Gatekeeper
//!
//! A layered authorization engine for loaded code. Given the domain a
//! piece of code runs in and the permission it asks for, the engine decides
//! whether to grant it by consulting several independent sources in a fixed
//! order.
//!
//! ## Sources
//!
//! - **Template**: the baseline policy, scoped by codebase to the jars on
//!   the process classpath
//! - **Untrusted**: a minimal policy for sandboxed script code, and the
//!   only source such code ever sees
//! - **Plugin**: one policy per plugin, consulted only for that plugin's code
//! - **Dynamic**: permissions the process registers while running
//! - **System**: the platform's default policy, with its unsafe defaults
//!   denied
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gatekeeper::{Engine, EngineConfig};
//! use gatekeeper::core::{Domain, Permission};
//! use gatekeeper::policy::{DefaultSystemPolicy, DynamicPermissions, PluginGrants};
//!
//! let dynamic = Arc::new(DynamicPermissions::new());
//! let engine = Engine::new(
//!     &EngineConfig::default(),
//!     Arc::clone(&dynamic),
//!     PluginGrants::empty(),
//!     Arc::new(DefaultSystemPolicy::new()),
//! )
//! .unwrap();
//!
//! let core = Domain::from_origin("/opt/app/lib/core.jar");
//! let listen = Permission::socket("*:9200", "listen").unwrap();
//! assert!(!engine.decide(&core, &listen).unwrap());
//!
//! dynamic.add(Permission::socket("*:9200-9300", "listen").unwrap());
//! assert!(engine.decide(&core, &listen).unwrap());
//!
//! // Ephemeral listening is a platform default, and denied.
//! let ephemeral = Permission::socket("localhost:0", "listen").unwrap();
//! assert!(!engine.decide(&core, &ephemeral).unwrap());
//! ```
//!
//! ## Re-exports
//!
//! - `gatekeeper::core` - Origins, domains and permissions
//! - `gatekeeper::policy` - Policy documents and permission sources

pub mod config;
pub mod engine;
pub mod error;

// Re-export component crates
pub use gatekeeper_core as core;
pub use gatekeeper_policy as policy;

pub use config::EngineConfig;
pub use engine::{Decision, DenyReason, Engine, EngineSources};
pub use error::{EngineError, Result};

pub use gatekeeper_core::{CodeSource, Domain, Origin, Permission, Permissions};
pub use gatekeeper_policy::{
    DefaultSystemPolicy, DynamicPermissions, PluginGrants, SourceKind, SystemPolicy,
    SystemPolicyError,
};
