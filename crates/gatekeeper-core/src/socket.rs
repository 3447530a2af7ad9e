//! Socket permission targets: `host[:portrange]`.
//!
//! Host comparison is purely lexical. Names are never resolved, so a grant
//! for `example.com` does not cover a request for the address it resolves
//! to. The loopback names `localhost`, `127.0.0.1` and `::1` are treated as
//! one host.

use std::fmt;

use crate::error::{CoreError, Result};

/// The host half of a socket target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostSpec {
    /// `*`: every host.
    Any,
    /// `*.example.com`, stored as the lowercased suffix `.example.com`.
    Suffix(String),
    /// A single lowercased host name or address literal.
    Exact(String),
}

const LOOPBACK: &[&str] = &["localhost", "127.0.0.1", "::1"];

impl HostSpec {
    /// Parse a host. An empty host means `localhost`.
    pub fn parse(host: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Ok(Self::exact("localhost"));
        }
        if host == "*" {
            return Ok(Self::Any);
        }
        if let Some(suffix) = host.strip_prefix('*') {
            if !suffix.starts_with('.') || suffix.len() < 2 || suffix.contains('*') {
                return Err(CoreError::InvalidHost(host.to_string()));
            }
            return Ok(Self::Suffix(suffix.to_ascii_lowercase()));
        }
        if host.contains('*') || host.contains(char::is_whitespace) {
            return Err(CoreError::InvalidHost(host.to_string()));
        }
        Ok(Self::exact(host))
    }

    /// An exact host.
    pub fn exact(host: &str) -> Self {
        Self::Exact(host.to_ascii_lowercase())
    }

    /// Check if this host pattern covers `other`.
    pub fn covers(&self, other: &HostSpec) -> bool {
        match (self, other) {
            (HostSpec::Any, _) => true,
            (HostSpec::Suffix(s), HostSpec::Suffix(t)) => t.ends_with(s.as_str()),
            (HostSpec::Suffix(s), HostSpec::Exact(h)) => h.ends_with(s.as_str()),
            (HostSpec::Exact(a), HostSpec::Exact(b)) => a == b || (is_loopback(a) && is_loopback(b)),
            _ => false,
        }
    }
}

fn is_loopback(host: &str) -> bool {
    LOOPBACK.contains(&host)
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostSpec::Any => f.write_str("*"),
            HostSpec::Suffix(s) => write!(f, "*{}", s),
            HostSpec::Exact(h) if h.contains(':') => write!(f, "[{}]", h),
            HostSpec::Exact(h) => f.write_str(h),
        }
    }
}

/// An inclusive port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub low: u16,
    pub high: u16,
}

impl PortRange {
    /// Every port.
    pub const ALL: Self = Self {
        low: 0,
        high: u16::MAX,
    };

    /// A single port.
    pub const fn single(port: u16) -> Self {
        Self {
            low: port,
            high: port,
        }
    }

    /// `port` and everything above it.
    pub const fn at_least(port: u16) -> Self {
        Self {
            low: port,
            high: u16::MAX,
        }
    }

    /// Parse `N`, `N-`, `-N`, `N-M` or `*`. An empty range means every port.
    pub fn parse(range: &str) -> Result<Self> {
        let range = range.trim();
        if range.is_empty() || range == "*" {
            return Ok(Self::ALL);
        }

        let invalid = || CoreError::InvalidPortRange(range.to_string());
        let port = |s: &str| s.trim().parse::<u16>().map_err(|_| invalid());

        let parsed = match range.split_once('-') {
            None => Self::single(port(range)?),
            Some(("", "")) => return Err(invalid()),
            Some(("", high)) => Self {
                low: 0,
                high: port(high)?,
            },
            Some((low, "")) => Self::at_least(port(low)?),
            Some((low, high)) => Self {
                low: port(low)?,
                high: port(high)?,
            },
        };

        if parsed.low > parsed.high {
            return Err(invalid());
        }
        Ok(parsed)
    }

    /// Check if `other` lies entirely inside this range.
    pub fn contains(&self, other: &PortRange) -> bool {
        self.low <= other.low && other.high <= self.high
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low, self.high) {
            (0, u16::MAX) => f.write_str("*"),
            (low, high) if low == high => write!(f, "{}", low),
            (low, u16::MAX) => write!(f, "{}-", low),
            (low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

/// Split a socket permission name into host and port range.
///
/// IPv6 literals carrying a port must be bracketed (`[::1]:8080`). An
/// unbracketed name with more than one colon is taken as a bare IPv6 host.
pub fn parse_target(name: &str) -> Result<(HostSpec, PortRange)> {
    let name = name.trim();

    if let Some(rest) = name.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| CoreError::InvalidHost(name.to_string()))?;
        let ports = match tail {
            "" => PortRange::ALL,
            tail => PortRange::parse(
                tail.strip_prefix(':')
                    .ok_or_else(|| CoreError::InvalidHost(name.to_string()))?,
            )?,
        };
        return Ok((HostSpec::parse(host)?, ports));
    }

    if name.matches(':').count() > 1 {
        return Ok((HostSpec::parse(name)?, PortRange::ALL));
    }

    match name.split_once(':') {
        Some((host, ports)) => Ok((HostSpec::parse(host)?, PortRange::parse(ports)?)),
        None => Ok((HostSpec::parse(name)?, PortRange::ALL)),
    }
}
