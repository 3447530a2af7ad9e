//! # Gatekeeper Testkit
//!
//! Testing utilities for Gatekeeper.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Decision scenarios**: Named checks with the explanation every engine must give
//! - **Generators**: Proptest strategies for permissions, origins and domains
//! - **Fixtures**: An engine builder over in-memory sources, and test platform policies
//!
//! ## Decision Scenarios
//!
//! ```rust
//! use gatekeeper_testkit::scenarios::verify_all_scenarios;
//!
//! for (name, matches, actual) in verify_all_scenarios() {
//!     assert!(matches, "{}: {}", name, actual);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use gatekeeper_testkit::generators::{bad_default_request, located_domain};
//!
//! proptest! {
//!     #[test]
//!     fn bad_defaults_never_granted(domain in located_domain(), permission in bad_default_request()) {
//!         let engine = EngineFixture::new().build();
//!         prop_assert!(!engine.decide(&domain, &permission).unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use gatekeeper_testkit::fixtures::{domain, EngineFixture, PLUGIN_JAR};
//! use gatekeeper_core::Permission;
//!
//! let engine = EngineFixture::new()
//!     .plugin(PLUGIN_JAR, Permission::runtime("loadLibrary.icu"))
//!     .build();
//! assert!(engine.decide(&domain(PLUGIN_JAR), &Permission::runtime("loadLibrary.icu")).unwrap());
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{
    domain, init_tracing, no_code_source, sandbox, unlocated, EngineFixture, FailingSystemPolicy,
    PolicyDir, RecordingSystemPolicy, CORE_JAR, PLUGIN_JAR,
};
pub use scenarios::{all_scenarios, verify_all_scenarios, DecisionScenario};
