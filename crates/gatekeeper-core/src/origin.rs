//! Origins, code sources and domains.
//!
//! A [`Domain`] is what the engine receives with every check. It may carry a
//! [`CodeSource`], which may in turn carry a location ([`Origin`]). Either
//! can be missing, and the two cases are kept apart by [`OriginResolution`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File component of the origin reserved for dynamically evaluated scripts.
pub const SANDBOX_ORIGIN: &str = "/untrusted";

/// Location a unit of code was loaded from.
///
/// Either a URL (`file:/opt/app/lib/core.jar`) or a plain path. Comparisons
/// made by the engine use [`Origin::file`], the location with any scheme and
/// authority removed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    /// Create an origin from a location string.
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// The origin of sandboxed script code.
    pub fn sandbox() -> Self {
        Self(SANDBOX_ORIGIN.to_string())
    }

    /// The location as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path component of the location.
    ///
    /// `file:/a/b.jar`, `file:///a/b.jar` and `/a/b.jar` all yield `/a/b.jar`.
    pub fn file(&self) -> &str {
        let location = self.0.as_str();
        let rest = match location.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) => rest,
            _ => location,
        };
        match rest.strip_prefix("//") {
            Some(authority_and_path) => authority_and_path
                .find('/')
                .map_or("", |idx| &authority_and_path[idx..]),
            None => rest,
        }
    }

    /// Last segment of the path component (`core.jar` for `/a/core.jar`).
    pub fn file_name(&self) -> Option<&str> {
        self.file()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// True if this is the sandbox marker.
    pub fn is_sandbox(&self) -> bool {
        self.file() == SANDBOX_ORIGIN
    }
}

/// A scheme has at least two characters, so `C:` drive letters are not one.
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    candidate.len() >= 2
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Origin({})", self.0)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Origin {
    fn from(location: &str) -> Self {
        Self::new(location)
    }
}

impl From<String> for Origin {
    fn from(location: String) -> Self {
        Self(location)
    }
}

impl From<&Path> for Origin {
    fn from(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

/// Where a unit of code came from.
///
/// The location is optional: some platforms hand out code sources without
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeSource {
    location: Option<Origin>,
}

impl CodeSource {
    /// A code source loaded from `origin`.
    pub fn new(origin: impl Into<Origin>) -> Self {
        Self {
            location: Some(origin.into()),
        }
    }

    /// A code source without a location.
    pub fn unlocated() -> Self {
        Self { location: None }
    }

    /// The location, if any.
    pub fn location(&self) -> Option<&Origin> {
        self.location.as_ref()
    }
}

/// Execution context of a loaded unit of code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    code_source: Option<CodeSource>,
}

impl Domain {
    /// A domain for `code_source`.
    pub fn new(code_source: CodeSource) -> Self {
        Self {
            code_source: Some(code_source),
        }
    }

    /// A domain for code loaded from `origin`.
    pub fn from_origin(origin: impl Into<Origin>) -> Self {
        Self::new(CodeSource::new(origin))
    }

    /// A domain for sandboxed script code.
    pub fn sandbox() -> Self {
        Self::from_origin(Origin::sandbox())
    }

    /// A domain with no code source, as seen after privileges are reduced.
    pub fn without_code_source() -> Self {
        Self { code_source: None }
    }

    /// The code source, if any.
    pub fn code_source(&self) -> Option<&CodeSource> {
        self.code_source.as_ref()
    }

    /// The location of the code source, if both exist.
    pub fn location(&self) -> Option<&Origin> {
        self.code_source.as_ref().and_then(CodeSource::location)
    }

    /// Resolve the origin of this domain.
    pub fn resolve_origin(&self) -> OriginResolution<'_> {
        match &self.code_source {
            None => OriginResolution::NoCodeSource,
            Some(code_source) => match code_source.location() {
                None => OriginResolution::NoLocation,
                Some(origin) => OriginResolution::Located(origin),
            },
        }
    }
}

/// Outcome of resolving a domain's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginResolution<'a> {
    /// The domain has no code source at all.
    NoCodeSource,
    /// The code source exists but has no location.
    NoLocation,
    /// The code was loaded from this origin.
    Located(&'a Origin),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_file_strips_scheme_and_authority() {
        assert_eq!(Origin::new("file:/plugins/foo.jar").file(), "/plugins/foo.jar");
        assert_eq!(Origin::new("file:///plugins/foo.jar").file(), "/plugins/foo.jar");
        assert_eq!(
            Origin::new("file://host/plugins/foo.jar").file(),
            "/plugins/foo.jar"
        );
        assert_eq!(Origin::new("/plugins/foo.jar").file(), "/plugins/foo.jar");
        assert_eq!(Origin::new("C:/plugins/foo.jar").file(), "C:/plugins/foo.jar");
    }

    #[test]
    fn test_origin_file_name() {
        assert_eq!(Origin::new("file:/lib/core-1.0.jar").file_name(), Some("core-1.0.jar"));
        assert_eq!(Origin::new("/lib/classes/").file_name(), Some("classes"));
        assert_eq!(Origin::new("/").file_name(), None);
    }

    #[test]
    fn test_sandbox_marker() {
        assert!(Origin::sandbox().is_sandbox());
        assert!(Origin::new("file:/untrusted").is_sandbox());
        assert!(!Origin::new("/untrusted/script.js").is_sandbox());
    }

    #[test]
    fn test_resolution_keeps_missing_cases_apart() {
        assert_eq!(
            Domain::without_code_source().resolve_origin(),
            OriginResolution::NoCodeSource
        );
        assert_eq!(
            Domain::new(CodeSource::unlocated()).resolve_origin(),
            OriginResolution::NoLocation
        );

        let domain = Domain::from_origin("/lib/app.jar");
        assert_eq!(
            domain.resolve_origin(),
            OriginResolution::Located(&Origin::new("/lib/app.jar"))
        );
    }

    #[test]
    fn test_origin_serde_is_transparent() {
        let origin: Origin = serde_json::from_str("\"/lib/app.jar\"").unwrap();
        assert_eq!(origin, Origin::new("/lib/app.jar"));
        assert_eq!(serde_json::to_string(&origin).unwrap(), "\"/lib/app.jar\"");
    }
}
