//! Decision properties of the engine.
//!
//! Every property here must hold for any engine, whatever its sources hold.

use std::sync::Arc;
use std::thread;

use gatekeeper::policy::{DefaultSystemPolicy, DynamicPermissions};
use gatekeeper::{Decision, DenyReason, EngineError, Permission, Permissions, SourceKind};
use gatekeeper_testkit::generators::{bad_default_request, located_domain, permission};
use gatekeeper_testkit::{
    domain, init_tracing, no_code_source, sandbox, unlocated, verify_all_scenarios, EngineFixture,
    FailingSystemPolicy, RecordingSystemPolicy, CORE_JAR, PLUGIN_JAR,
};
use proptest::prelude::*;

fn socket(name: &str, actions: &str) -> Permission {
    Permission::socket(name, actions).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    /// Sandboxed code sees the untrusted policy and nothing else, even when
    /// every other source grants everything.
    #[test]
    fn sandbox_decision_is_untrusted_decision(wanted in permission(), granted in permission()) {
        let engine = EngineFixture::new()
            .template(Permission::All)
            .dynamic(Permission::All)
            .system(Arc::new(RecordingSystemPolicy::new(Permissions::from_iter([Permission::All]))))
            .untrusted(granted.clone())
            .build();

        prop_assert_eq!(engine.decide(&sandbox(), &wanted).unwrap(), granted.implies(&wanted));
    }

    /// Without a location nothing is granted, not even unconditional grants.
    #[test]
    fn unresolvable_origin_is_always_denied(wanted in permission()) {
        let engine = EngineFixture::new()
            .template(Permission::All)
            .dynamic(Permission::All)
            .build();

        prop_assert!(!engine.decide(&unlocated(), &wanted).unwrap());
        prop_assert!(!engine.decide(&no_code_source(), &wanted).unwrap());
    }

    /// A plugin's grant holds whatever the other sources say.
    #[test]
    fn plugin_grant_is_sufficient(wanted in permission()) {
        let engine = EngineFixture::new()
            .plugin(PLUGIN_JAR, wanted.clone())
            .system(Arc::new(RecordingSystemPolicy::new(Permissions::new())))
            .build();

        prop_assert_eq!(
            engine.explain(&domain(PLUGIN_JAR), &wanted).unwrap(),
            Decision::Granted(SourceKind::Plugin)
        );
    }

    /// Bad defaults granted by the platform are denied when nothing else
    /// grants them.
    #[test]
    fn bad_defaults_are_denied(code in located_domain(), wanted in bad_default_request()) {
        let system = Arc::new(RecordingSystemPolicy::defaults());
        let engine = EngineFixture::new().system(system.clone()).build();

        let decision = engine.explain(&code, &wanted).unwrap();
        prop_assert!(matches!(decision, Decision::Denied(DenyReason::Blacklisted(_))));
        prop_assert_eq!(system.calls(), 0);
    }

    /// Outside the blacklist the filtered platform answers exactly as the
    /// platform does.
    #[test]
    fn filter_passes_other_requests_through(code in located_domain(), wanted in permission(), granted in permission()) {
        prop_assume!(gatekeeper::policy::find_bad_default(&wanted).is_none());

        let platform = Permissions::from_iter([granted.clone()]);
        let engine = EngineFixture::new()
            .system(Arc::new(RecordingSystemPolicy::new(platform)))
            .build();

        prop_assert_eq!(engine.decide(&code, &wanted).unwrap(), granted.implies(&wanted));
    }

    /// Repeated checks agree when nothing is appended in between.
    #[test]
    fn decisions_are_idempotent(code in located_domain(), wanted in permission()) {
        let engine = EngineFixture::new()
            .template(Permission::runtime("setContextClassLoader"))
            .dynamic(socket("*:9200-9300", "listen"))
            .build();

        let first = engine.explain(&code, &wanted).unwrap();
        for _ in 0..3 {
            prop_assert_eq!(engine.explain(&code, &wanted).unwrap(), first);
        }
    }

    /// `decide` is `explain` reduced to a boolean.
    #[test]
    fn explain_agrees_with_decide(code in located_domain(), wanted in permission()) {
        let engine = EngineFixture::new()
            .template(Permission::runtime("exitVM.*"))
            .untrusted(Permission::runtime("getClassLoader"))
            .build();

        prop_assert_eq!(
            engine.explain(&code, &wanted).unwrap().is_granted(),
            engine.decide(&code, &wanted).unwrap()
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_scenarios() {
    init_tracing();

    let failures: Vec<_> = verify_all_scenarios()
        .into_iter()
        .filter(|(_, matches, _)| !matches)
        .collect();
    assert!(failures.is_empty(), "failing scenarios: {:?}", failures);
}

#[test]
fn test_sandbox_file_read_denied() {
    let engine = EngineFixture::new()
        .template(Permission::file("<<ALL FILES>>", "read").unwrap())
        .untrusted(Permission::runtime("getClassLoader"))
        .build();

    assert!(!engine
        .decide(&sandbox(), &Permission::file("/var/data/index", "read").unwrap())
        .unwrap());
}

#[test]
fn test_stop_thread_denied_by_filter() {
    let engine = EngineFixture::new().build();
    let decision = engine
        .explain(&domain(CORE_JAR), &Permission::runtime("stopThread"))
        .unwrap();

    match decision {
        Decision::Denied(DenyReason::Blacklisted(entry)) => {
            assert_eq!(entry.name(), "stop_thread");
            assert_eq!(entry.permission(), &Permission::runtime("stopThread"));
        }
        other => panic!("unexpected decision: {other}"),
    }
}

#[test]
fn test_plugin_connect_short_circuits() {
    let system = Arc::new(RecordingSystemPolicy::defaults());
    let engine = EngineFixture::new()
        .plugin("/plugins/foo.jar", socket("*:443", "connect"))
        .system(system.clone())
        .build();

    assert!(engine
        .decide(&domain("/plugins/foo.jar"), &socket("api.example.com:443", "connect"))
        .unwrap());
    // neither template, dynamic nor system were needed
    assert_eq!(system.calls(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering and errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_template_short_circuits_system() {
    let system = Arc::new(RecordingSystemPolicy::defaults());
    let engine = EngineFixture::new()
        .template(Permission::runtime("setContextClassLoader"))
        .system(system.clone())
        .build();

    assert_eq!(
        engine
            .explain(&domain(CORE_JAR), &Permission::runtime("setContextClassLoader"))
            .unwrap(),
        Decision::Granted(SourceKind::Template)
    );
    assert_eq!(system.calls(), 0);
}

#[test]
fn test_plugin_denial_falls_through() {
    let engine = EngineFixture::new()
        .plugin(PLUGIN_JAR, Permission::runtime("loadLibrary.icu"))
        .dynamic(Permission::runtime("custom.reload"))
        .build();

    assert_eq!(
        engine
            .explain(&domain(PLUGIN_JAR), &Permission::runtime("custom.reload"))
            .unwrap(),
        Decision::Granted(SourceKind::Dynamic)
    );
}

#[test]
fn test_working_directory_grant_stays_relative() {
    let engine = EngineFixture::new()
        .template(Permission::file("-", "read").unwrap())
        .build();
    let core = domain(CORE_JAR);

    assert!(engine
        .decide(&core, &Permission::file("logs/gc.log", "read").unwrap())
        .unwrap());
    assert_eq!(
        engine
            .explain(&core, &Permission::file("/etc/passwd", "read").unwrap())
            .unwrap(),
        Decision::Denied(DenyReason::NoGrant)
    );
}

#[test]
fn test_dynamic_grants_beat_blacklist() {
    // the filter only narrows the platform policy
    let engine = EngineFixture::new()
        .dynamic(socket("localhost:0", "listen"))
        .build();

    assert!(engine
        .decide(&domain(CORE_JAR), &socket("localhost:0", "listen"))
        .unwrap());
}

#[test]
fn test_system_failure_propagates() {
    let engine = EngineFixture::new()
        .system(Arc::new(FailingSystemPolicy))
        .build();

    let err = engine
        .decide(&domain(CORE_JAR), &Permission::runtime("modifyThread"))
        .unwrap_err();
    assert!(matches!(err, EngineError::SystemPolicy(_)));
    assert!(err.to_string().contains("platform policy store unreadable"));
}

#[test]
fn test_system_failure_unreachable_after_grant() {
    let engine = EngineFixture::new()
        .template(Permission::runtime("modifyThread"))
        .system(Arc::new(FailingSystemPolicy))
        .build();

    assert!(engine
        .decide(&domain(CORE_JAR), &Permission::runtime("modifyThread"))
        .unwrap());
    // blacklisted requests never reach the failing platform
    assert!(!engine
        .decide(&domain(CORE_JAR), &Permission::runtime("stopThread"))
        .unwrap());
    // and sandboxed code never consults it
    assert!(!engine
        .decide(&sandbox(), &Permission::runtime("modifyThread"))
        .unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Dynamic permissions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dynamic_appends_become_visible() {
    let dynamic = Arc::new(DynamicPermissions::new());
    let engine = EngineFixture::new()
        .shared_dynamic(Arc::clone(&dynamic))
        .build();
    let listen = socket("*:9300", "listen");

    assert!(!engine.decide(&domain(CORE_JAR), &listen).unwrap());
    dynamic.add(socket("*:9300-9400", "listen"));
    assert!(engine.decide(&domain(CORE_JAR), &listen).unwrap());
    assert!(Arc::ptr_eq(engine.dynamic(), &dynamic));
}

#[test]
fn test_concurrent_decisions_during_appends() {
    let dynamic = Arc::new(DynamicPermissions::new());
    let engine = Arc::new(
        EngineFixture::new()
            .shared_dynamic(Arc::clone(&dynamic))
            .system(Arc::new(DefaultSystemPolicy::new()))
            .build(),
    );

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..200 {
                    // bad defaults stay denied throughout
                    assert!(!engine
                        .decide(&domain(CORE_JAR), &Permission::runtime("stopThread"))
                        .unwrap());
                }
            })
        })
        .collect();

    for port in 9200..9250u16 {
        dynamic.add(socket(&format!("*:{}", port), "listen"));
    }
    for reader in readers {
        reader.join().unwrap();
    }

    assert!(engine
        .decide(&domain(CORE_JAR), &socket("*:9249", "listen"))
        .unwrap());
}
