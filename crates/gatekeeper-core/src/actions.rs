//! Action sets for permissions that carry actions.
//!
//! Actions are written as a comma separated list (`"connect,accept"`).
//! Parsing is case-insensitive and ignores surrounding whitespace. Each set
//! renders back in a fixed canonical order.

use std::fmt;

use bitflags::bitflags;

use crate::error::{CoreError, Result};

bitflags! {
    /// Actions of a socket permission.
    ///
    /// `connect`, `listen` and `accept` each imply `resolve`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SocketActions: u8 {
        const CONNECT = 0b0001;
        const LISTEN  = 0b0010;
        const ACCEPT  = 0b0100;
        const RESOLVE = 0b1000;
    }
}

bitflags! {
    /// Actions of a file permission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileActions: u8 {
        const READ     = 0b0_0001;
        const WRITE    = 0b0_0010;
        const EXECUTE  = 0b0_0100;
        const DELETE   = 0b0_1000;
        const READLINK = 0b1_0000;
    }
}

bitflags! {
    /// Actions of a property permission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyActions: u8 {
        const READ  = 0b01;
        const WRITE = 0b10;
    }
}

const SOCKET_NAMES: &[(&str, SocketActions)] = &[
    ("connect", SocketActions::CONNECT),
    ("listen", SocketActions::LISTEN),
    ("accept", SocketActions::ACCEPT),
    ("resolve", SocketActions::RESOLVE),
];

const FILE_NAMES: &[(&str, FileActions)] = &[
    ("read", FileActions::READ),
    ("write", FileActions::WRITE),
    ("execute", FileActions::EXECUTE),
    ("delete", FileActions::DELETE),
    ("readlink", FileActions::READLINK),
];

const PROPERTY_NAMES: &[(&str, PropertyActions)] = &[
    ("read", PropertyActions::READ),
    ("write", PropertyActions::WRITE),
];

/// Parse a comma separated action list against a name table.
fn parse_list<F: Copy + bitflags::Flags>(
    kind: &'static str,
    actions: &str,
    table: &[(&str, F)],
) -> Result<F> {
    let mut set = F::empty();
    for action in actions.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        let flag = table
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(action))
            .map(|(_, flag)| *flag)
            .ok_or_else(|| CoreError::UnknownAction {
                kind,
                action: action.to_string(),
            })?;
        set = set.union(flag);
    }
    if set.is_empty() {
        return Err(CoreError::EmptyActions(kind));
    }
    Ok(set)
}

/// Render a set in table order.
fn write_list<F: Copy + bitflags::Flags>(
    f: &mut fmt::Formatter<'_>,
    set: F,
    table: &[(&str, F)],
) -> fmt::Result {
    let mut first = true;
    for (name, flag) in table {
        if set.contains(*flag) {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(name)?;
            first = false;
        }
    }
    Ok(())
}

impl SocketActions {
    /// Parse a socket action list, adding the implicit `resolve`.
    pub fn parse(actions: &str) -> Result<Self> {
        let set = parse_list("socket", actions, SOCKET_NAMES)?;
        if set.intersects(Self::CONNECT | Self::LISTEN | Self::ACCEPT) {
            Ok(set | Self::RESOLVE)
        } else {
            Ok(set)
        }
    }

    /// True if nothing but `resolve` is requested.
    pub fn is_resolve_only(&self) -> bool {
        *self == Self::RESOLVE
    }
}

impl FileActions {
    /// Parse a file action list.
    pub fn parse(actions: &str) -> Result<Self> {
        parse_list("file", actions, FILE_NAMES)
    }
}

impl PropertyActions {
    /// Parse a property action list.
    pub fn parse(actions: &str) -> Result<Self> {
        parse_list("property", actions, PROPERTY_NAMES)
    }
}

impl fmt::Display for SocketActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, *self, SOCKET_NAMES)
    }
}

impl fmt::Display for FileActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, *self, FILE_NAMES)
    }
}

impl fmt::Display for PropertyActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, *self, PROPERTY_NAMES)
    }
}
