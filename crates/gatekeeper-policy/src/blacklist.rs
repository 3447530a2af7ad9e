//! Bad default permissions.
//!
//! Platform default policies have historically granted a few permissions to
//! every piece of code. The filtered system source denies these regardless
//! of what the wrapped policy says.
//!
//! Each entry pairs the permission with a guard. The guard is a cheap shape
//! test run first; the permission's own implication check only runs when
//! the guard matches. Socket implication in particular can be costly on
//! platforms that resolve host names while comparing.

use std::fmt;
use std::sync::OnceLock;

use gatekeeper_core::{HostSpec, Permission, PortRange, SocketActions};

/// Cheap pre-check applied to a requested permission.
pub type Guard = fn(&Permission) -> bool;

/// A wrapped bad default permission.
pub struct BadDefault {
    name: &'static str,
    guard: Guard,
    permission: Permission,
}

impl BadDefault {
    /// Name used in logs and decision explanations.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The permission being neutralized.
    pub fn permission(&self) -> &Permission {
        &self.permission
    }

    /// Check if `requested` is covered by this bad default.
    ///
    /// The guard runs first; implication is only checked when it matches.
    pub fn denies(&self, requested: &Permission) -> bool {
        (self.guard)(requested) && self.permission.implies(requested)
    }
}

impl fmt::Debug for BadDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadDefault")
            .field("name", &self.name)
            .field("permission", &self.permission)
            .finish()
    }
}

impl PartialEq for BadDefault {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BadDefault {}

fn always(_: &Permission) -> bool {
    true
}

fn socket_listen(permission: &Permission) -> bool {
    permission
        .socket_actions()
        .is_some_and(|actions| actions.contains(SocketActions::LISTEN))
}

fn localhost_listen(ports: PortRange) -> Permission {
    Permission::Socket {
        host: HostSpec::exact("localhost"),
        ports,
        actions: SocketActions::LISTEN | SocketActions::RESOLVE,
    }
}

/// The fixed list of bad defaults.
pub fn bad_defaults() -> &'static [BadDefault] {
    static BAD_DEFAULTS: OnceLock<[BadDefault; 4]> = OnceLock::new();
    BAD_DEFAULTS.get_or_init(|| {
        [
            // Thread.stop is inherently unsafe
            BadDefault {
                name: "stop_thread",
                guard: always,
                permission: Permission::runtime("stopThread"),
            },
            // listening on ephemeral ports
            BadDefault {
                name: "listen_ephemeral",
                guard: socket_listen,
                permission: localhost_listen(PortRange::single(0)),
            },
            // older platforms spelled the same grant as the high port range
            BadDefault {
                name: "listen_high_ports",
                guard: socket_listen,
                permission: localhost_listen(PortRange::at_least(1024)),
            },
            // the standard RMI registry port
            BadDefault {
                name: "listen_registry",
                guard: socket_listen,
                permission: localhost_listen(PortRange::single(1099)),
            },
        ]
    })
}

/// The first bad default covering `requested`, if any.
pub fn find_bad_default(requested: &Permission) -> Option<&'static BadDefault> {
    bad_defaults().iter().find(|entry| entry.denies(requested))
}
