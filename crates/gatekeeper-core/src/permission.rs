//! Permissions and the implication relation between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actions::{FileActions, PropertyActions, SocketActions};
use crate::error::{CoreError, Result};
use crate::path::PathPattern;
use crate::socket::{self, HostSpec, PortRange};

/// A typed capability request, or a grant of one.
///
/// `a.implies(&b)` holds when holding `a` is enough to perform `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PermissionSpec", into = "PermissionSpec")]
pub enum Permission {
    /// Every permission.
    All,

    /// A named runtime capability such as `stopThread` or `exitVM.*`.
    Runtime { name: String },

    /// Access to a named property.
    Property {
        name: String,
        actions: PropertyActions,
    },

    /// Access to files.
    File {
        path: PathPattern,
        actions: FileActions,
    },

    /// Network access to hosts and ports.
    Socket {
        host: HostSpec,
        ports: PortRange,
        actions: SocketActions,
    },
}

impl Permission {
    /// A runtime permission.
    pub fn runtime(name: impl Into<String>) -> Self {
        Permission::Runtime { name: name.into() }
    }

    /// A property permission, e.g. `("os.name", "read")`.
    pub fn property(name: &str, actions: &str) -> Result<Self> {
        let name = non_empty("property", name)?;
        Ok(Permission::Property {
            name,
            actions: PropertyActions::parse(actions)?,
        })
    }

    /// A file permission, e.g. `("/var/data/-", "read,write")`.
    pub fn file(path: &str, actions: &str) -> Result<Self> {
        let path = PathPattern::parse(path).ok_or(CoreError::EmptyName("file"))?;
        Ok(Permission::File {
            path,
            actions: FileActions::parse(actions)?,
        })
    }

    /// A socket permission, e.g. `("localhost:1024-", "listen")`.
    pub fn socket(name: &str, actions: &str) -> Result<Self> {
        let (host, ports) = socket::parse_target(name)?;
        Ok(Permission::Socket {
            host,
            ports,
            actions: SocketActions::parse(actions)?,
        })
    }

    /// Build a permission from its textual triple.
    pub fn parse(kind: &str, name: &str, actions: Option<&str>) -> Result<Self> {
        let actions = actions.map(str::trim).filter(|a| !a.is_empty());
        match kind.trim().to_ascii_lowercase().as_str() {
            "all" => no_actions("all", actions).map(|()| Permission::All),
            "runtime" => {
                no_actions("runtime", actions)?;
                Ok(Permission::runtime(non_empty("runtime", name)?))
            }
            "property" => Permission::property(name, actions.unwrap_or_default()),
            "file" => Permission::file(name, actions.unwrap_or_default()),
            "socket" => Permission::socket(name, actions.unwrap_or_default()),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }

    /// Short type name (`runtime`, `socket`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Permission::All => "all",
            Permission::Runtime { .. } => "runtime",
            Permission::Property { .. } => "property",
            Permission::File { .. } => "file",
            Permission::Socket { .. } => "socket",
        }
    }

    /// Socket actions, for socket permissions.
    pub fn socket_actions(&self) -> Option<SocketActions> {
        match self {
            Permission::Socket { actions, .. } => Some(*actions),
            _ => None,
        }
    }

    /// Check if holding `self` is sufficient for `other`.
    pub fn implies(&self, other: &Permission) -> bool {
        match (self, other) {
            (Permission::All, _) => true,
            (Permission::Runtime { name: granted }, Permission::Runtime { name: wanted }) => {
                name_implies(granted, wanted)
            }
            (
                Permission::Property {
                    name: granted,
                    actions: held,
                },
                Permission::Property {
                    name: wanted,
                    actions: needed,
                },
            ) => held.contains(*needed) && name_implies(granted, wanted),
            (
                Permission::File {
                    path: granted,
                    actions: held,
                },
                Permission::File {
                    path: wanted,
                    actions: needed,
                },
            ) => held.contains(*needed) && granted.covers(wanted),
            (
                Permission::Socket {
                    host,
                    ports,
                    actions: held,
                },
                Permission::Socket {
                    host: wanted_host,
                    ports: wanted_ports,
                    actions: needed,
                },
            ) => {
                held.contains(*needed)
                    // resolving a name does not involve a port
                    && (needed.is_resolve_only() || ports.contains(wanted_ports))
                    && host.covers(wanted_host)
            }
            _ => false,
        }
    }
}

/// Dotted-name implication with a trailing wildcard.
///
/// `*` implies everything, `a.*` implies `a.b`, `a.b.c` and `a.b.*`, but not
/// `a` itself.
fn name_implies(granted: &str, wanted: &str) -> bool {
    match granted.strip_suffix('*') {
        Some(prefix) if prefix.is_empty() || prefix.ends_with('.') => match wanted.strip_suffix('*') {
            Some(wanted_prefix) => wanted_prefix.starts_with(prefix),
            None => wanted.len() > prefix.len() && wanted.starts_with(prefix),
        },
        _ => granted == wanted,
    }
}

fn non_empty(kind: &'static str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::EmptyName(kind));
    }
    Ok(name.to_string())
}

fn no_actions(kind: &'static str, actions: Option<&str>) -> Result<()> {
    match actions {
        None => Ok(()),
        Some(actions) => Err(CoreError::UnexpectedActions {
            kind,
            actions: actions.to_string(),
        }),
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::All => f.write_str("(all)"),
            Permission::Runtime { name } => write!(f, "(runtime {:?})", name),
            Permission::Property { name, actions } => {
                write!(f, "(property {:?} \"{}\")", name, actions)
            }
            Permission::File { path, actions } => {
                write!(f, "(file \"{}\" \"{}\")", path, actions)
            }
            Permission::Socket {
                host,
                ports,
                actions,
            } => write!(f, "(socket \"{}:{}\" \"{}\")", host, ports, actions),
        }
    }
}

/// Serialized form of a permission: `{"type", "name", "actions"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
}

impl PermissionSpec {
    /// Create a spec from its parts.
    pub fn new(kind: &str, name: &str, actions: Option<&str>) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            actions: actions.map(String::from),
        }
    }
}

impl TryFrom<PermissionSpec> for Permission {
    type Error = CoreError;

    fn try_from(spec: PermissionSpec) -> Result<Self> {
        Permission::parse(&spec.kind, &spec.name, spec.actions.as_deref())
    }
}

impl From<Permission> for PermissionSpec {
    fn from(permission: Permission) -> Self {
        let kind = permission.kind().to_string();
        match permission {
            Permission::All => Self {
                kind,
                name: String::new(),
                actions: None,
            },
            Permission::Runtime { name } => Self {
                kind,
                name,
                actions: None,
            },
            Permission::Property { name, actions } => Self {
                kind,
                name,
                actions: Some(actions.to_string()),
            },
            Permission::File { path, actions } => Self {
                kind,
                name: path.to_string(),
                actions: Some(actions.to_string()),
            },
            Permission::Socket {
                host,
                ports,
                actions,
            } => Self {
                kind,
                name: format!("{}:{}", host, ports),
                actions: Some(actions.to_string()),
            },
        }
    }
}
