//! Codebase patterns scoping grant blocks to origins.

use gatekeeper_core::{Origin, PathPattern};

/// A codebase: `/lib/core.jar`, `/plugins/-` or `/lib/*`.
///
/// Matching uses the file component of both the codebase and the origin, so
/// `file:/lib/core.jar` and `/lib/core.jar` are the same codebase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebase {
    location: Origin,
    pattern: PathPattern,
}

impl Codebase {
    /// Parse an expanded codebase location. Returns `None` if it has no path.
    pub fn parse(location: &str) -> Option<Self> {
        let location = Origin::new(location.trim());
        let pattern = PathPattern::parse(location.file())?;
        Some(Self { location, pattern })
    }

    /// The location as written (after expansion).
    pub fn location(&self) -> &Origin {
        &self.location
    }

    /// Check if code loaded from `origin` falls under this codebase.
    pub fn covers(&self, origin: &Origin) -> bool {
        match PathPattern::parse(origin.file()) {
            Some(PathPattern::Exact(path)) => self.pattern.covers(&PathPattern::Exact(path)),
            // an origin is a single location, never a pattern
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_codebase() {
        let codebase = Codebase::parse("file:/opt/gk/lib/jna.jar").unwrap();
        assert!(codebase.covers(&Origin::new("/opt/gk/lib/jna.jar")));
        assert!(codebase.covers(&Origin::new("file:///opt/gk/lib/jna.jar")));
        assert!(!codebase.covers(&Origin::new("/opt/gk/lib/jna-extra.jar")));
    }

    #[test]
    fn test_directory_codebases() {
        let recursive = Codebase::parse("/plugins/-").unwrap();
        assert!(recursive.covers(&Origin::new("/plugins/analysis/analysis.jar")));

        let children = Codebase::parse("/plugins/*").unwrap();
        assert!(children.covers(&Origin::new("/plugins/foo.jar")));
        assert!(!children.covers(&Origin::new("/plugins/analysis/analysis.jar")));
    }

    #[test]
    fn test_wildcard_origins_never_match() {
        let codebase = Codebase::parse("/plugins/-").unwrap();
        assert!(!codebase.covers(&Origin::new("/plugins/*")));
    }

    #[test]
    fn test_empty_codebase() {
        assert!(Codebase::parse("  ").is_none());
        assert!(Codebase::parse("file://host").is_none());
    }
}
