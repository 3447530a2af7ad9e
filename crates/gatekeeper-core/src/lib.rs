//! # Gatekeeper Core
//!
//! Pure primitives for the Gatekeeper authorization engine: where code came
//! from, and what it is asking to do.
//!
//! This crate contains no I/O and no policy. It is pure computation over
//! permission values and their implication relation.
//!
//! ## Key Types
//!
//! - [`Origin`] - Location a unit of code was loaded from
//! - [`Domain`] - Execution context of loaded code, carrying its [`CodeSource`]
//! - [`Permission`] - A typed capability request (runtime, property, file, socket, all)
//! - [`Permissions`] - An append-only collection answering "does this imply P?"
//!
//! ## Implication
//!
//! A broader grant implies a narrower request:
//!
//! ```rust
//! use gatekeeper_core::Permission;
//!
//! let granted = Permission::socket("localhost:1024-", "listen").unwrap();
//! let requested = Permission::socket("localhost:9200", "listen").unwrap();
//! assert!(granted.implies(&requested));
//! assert!(!requested.implies(&granted));
//! ```

pub mod actions;
pub mod collection;
pub mod error;
pub mod origin;
pub mod path;
pub mod permission;
pub mod socket;

pub use actions::{FileActions, PropertyActions, SocketActions};
pub use collection::Permissions;
pub use error::{CoreError, Result};
pub use origin::{CodeSource, Domain, Origin, OriginResolution, SANDBOX_ORIGIN};
pub use path::PathPattern;
pub use permission::{Permission, PermissionSpec};
pub use socket::{HostSpec, PortRange};
