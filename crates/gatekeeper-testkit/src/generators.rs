//! Proptest generators for property-based testing.

use proptest::prelude::*;

use gatekeeper_core::{Domain, Origin, Permission};

/// Generate a dotted runtime or property name.
pub fn dotted_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z]{0,10}(\\.[a-z][a-zA-Z]{0,8}){0,2}".prop_map(String::from)
}

/// Generate a dotted name or a wildcard over one.
pub fn name_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => dotted_name(),
        1 => Just("*".to_string()),
        1 => dotted_name().prop_map(|name| format!("{}.*", name)),
    ]
}

/// Generate a host in any of the accepted spellings.
pub fn host() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("localhost".to_string()),
        Just("127.0.0.1".to_string()),
        Just("[::1]".to_string()),
        "[a-z]{1,8}\\.example\\.com".prop_map(String::from),
        "10\\.0\\.[0-9]{1,2}\\.[0-9]{1,2}".prop_map(String::from),
    ]
}

/// Generate a host pattern, wildcards included.
pub fn host_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => host(),
        1 => Just("*".to_string()),
        1 => Just("*.example.com".to_string()),
    ]
}

/// Generate a port range in any of the accepted spellings.
pub fn port_range() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<u16>().prop_map(|port| port.to_string()),
        any::<u16>().prop_map(|port| format!("{}-", port)),
        any::<u16>().prop_map(|port| format!("-{}", port)),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| format!("{}-{}", a.min(b), a.max(b))),
        Just("*".to_string()),
    ]
}

/// Generate a non-empty socket action list.
pub fn socket_actions() -> impl Strategy<Value = String> {
    proptest::sample::subsequence(vec!["connect", "listen", "accept", "resolve"], 1..=4)
        .prop_map(|actions| actions.join(","))
}

/// Generate a non-empty file action list.
pub fn file_actions() -> impl Strategy<Value = String> {
    proptest::sample::subsequence(vec!["read", "write", "execute", "delete", "readlink"], 1..=5)
        .prop_map(|actions| actions.join(","))
}

/// Generate a file path or path pattern.
pub fn file_path() -> impl Strategy<Value = String> {
    let dir = "(/[a-z]{1,6}){1,3}";
    prop_oneof![
        3 => dir.prop_map(String::from),
        1 => dir.prop_map(|d| format!("{}/*", d)),
        1 => dir.prop_map(|d| format!("{}/-", d)),
        1 => Just("<<ALL FILES>>".to_string()),
    ]
}

/// Generate a socket permission.
pub fn socket_permission() -> impl Strategy<Value = Permission> {
    (host_pattern(), port_range(), socket_actions()).prop_map(|(host, ports, actions)| {
        Permission::socket(&format!("{}:{}", host, ports), &actions)
            .expect("generated socket permission is well formed")
    })
}

/// Generate any permission.
pub fn permission() -> impl Strategy<Value = Permission> {
    prop_oneof![
        3 => name_pattern().prop_map(Permission::runtime),
        2 => (name_pattern(), prop_oneof![Just("read"), Just("write"), Just("read,write")])
            .prop_map(|(name, actions)| {
                Permission::property(&name, actions).expect("generated property permission is well formed")
            }),
        2 => (file_path(), file_actions()).prop_map(|(path, actions)| {
            Permission::file(&path, &actions).expect("generated file permission is well formed")
        }),
        3 => socket_permission(),
        1 => Just(Permission::All),
    ]
}

/// Generate a request the bad default filter must deny: thread stopping,
/// or listening on a loopback port the platform used to hand out.
pub fn bad_default_request() -> impl Strategy<Value = Permission> {
    let loopback = prop_oneof![Just("localhost"), Just("127.0.0.1"), Just("[::1]")];
    let port = prop_oneof![Just(0u16), Just(1099u16), 1024u16..=u16::MAX];
    let actions = prop_oneof![Just("listen"), Just("listen,resolve")];

    prop_oneof![
        1 => Just(Permission::runtime("stopThread")),
        4 => (loopback, port, actions).prop_map(|(host, port, actions)| {
            Permission::socket(&format!("{}:{}", host, port), actions)
                .expect("generated socket permission is well formed")
        }),
    ]
}

/// Generate a jar origin, with or without a `file:` scheme.
pub fn jar_origin() -> impl Strategy<Value = Origin> {
    (any::<bool>(), "(/[a-z]{1,6}){1,3}/[a-z][a-z-]{0,10}\\.jar").prop_map(|(url, path)| {
        if url {
            Origin::new(format!("file:{}", path))
        } else {
            Origin::new(path)
        }
    })
}

/// Generate a domain for code loaded from a jar.
pub fn located_domain() -> impl Strategy<Value = Domain> {
    jar_origin().prop_map(Domain::from_origin)
}
