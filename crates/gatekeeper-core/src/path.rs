//! File permission targets.
//!
//! Paths are compared lexically after collapsing repeated separators. No
//! canonicalization against the filesystem takes place. Relative paths are
//! anchored at `./`, so a relative pattern never covers an absolute path.

use std::fmt;

/// Name of the pattern matching every file.
pub const ALL_FILES: &str = "<<ALL FILES>>";

/// Root of paths relative to the working directory.
const CWD: &str = "./";

/// A file permission target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPattern {
    /// `<<ALL FILES>>`.
    AllFiles,
    /// A single path.
    Exact(String),
    /// `dir/*`: every file directly inside `dir`. Stored as `dir/`.
    Children(String),
    /// `dir/-`: every file below `dir`, recursively. Stored as `dir/`.
    Recursive(String),
}

impl PathPattern {
    /// Parse a path pattern. Returns `None` for an empty path.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if path == ALL_FILES {
            return Some(Self::AllFiles);
        }
        let path = normalize(path);

        match path.as_str() {
            "*" | "./*" => return Some(Self::Children(CWD.to_string())),
            "-" | "./-" => return Some(Self::Recursive(CWD.to_string())),
            _ => {}
        }
        let path = anchor(path);
        if let Some(dir) = path.strip_suffix("/*") {
            return Some(Self::Children(format!("{}/", dir)));
        }
        if let Some(dir) = path.strip_suffix("/-") {
            return Some(Self::Recursive(format!("{}/", dir)));
        }
        Some(Self::Exact(path))
    }

    /// Check if this pattern covers `other`.
    pub fn covers(&self, other: &PathPattern) -> bool {
        match (self, other) {
            (PathPattern::AllFiles, _) => true,
            (_, PathPattern::AllFiles) => false,
            (PathPattern::Exact(a), PathPattern::Exact(b)) => a == b,
            (PathPattern::Exact(_), _) => false,
            (PathPattern::Children(dir), PathPattern::Exact(path)) => path
                .strip_prefix(dir.as_str())
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
            (PathPattern::Children(a), PathPattern::Children(b)) => a == b,
            (PathPattern::Children(_), PathPattern::Recursive(_)) => false,
            (PathPattern::Recursive(dir), PathPattern::Exact(path)) => {
                path.len() > dir.len() && path.starts_with(dir.as_str())
            }
            (PathPattern::Recursive(a), PathPattern::Children(b))
            | (PathPattern::Recursive(a), PathPattern::Recursive(b)) => b.starts_with(a.as_str()),
        }
    }
}

/// Collapse repeated `/` and drop a trailing `/` (except for the root).
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_slash = false;
    for c in path.chars() {
        if c == '/' {
            if last_slash {
                continue;
            }
            last_slash = true;
        } else {
            last_slash = false;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Prefix relative paths with `./`.
fn anchor(path: String) -> String {
    if path.starts_with('/') || path.starts_with(CWD) || path == "." {
        path
    } else {
        format!("{}{}", CWD, path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::AllFiles => f.write_str(ALL_FILES),
            PathPattern::Exact(p) => f.write_str(p),
            PathPattern::Children(dir) => write!(f, "{}*", dir),
            PathPattern::Recursive(dir) => write!(f, "{}-", dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathPattern {
        PathPattern::parse(s).unwrap()
    }

    #[test]
    fn test_recursive_covers_descendants() {
        let data = p("/var/lib/data/-");
        assert!(data.covers(&p("/var/lib/data/index/segment_1")));
        assert!(data.covers(&p("/var/lib/data/nodes/*")));
        assert!(data.covers(&p("/var/lib/data/nodes/-")));
        assert!(!data.covers(&p("/var/lib/data")));
        assert!(!data.covers(&p("/var/lib/database")));
    }

    #[test]
    fn test_children_covers_direct_files_only() {
        let tmp = p("/tmp/*");
        assert!(tmp.covers(&p("/tmp/x.lock")));
        assert!(!tmp.covers(&p("/tmp/sub/x.lock")));
        assert!(!tmp.covers(&p("/tmp/-")));
    }

    #[test]
    fn test_all_files() {
        assert!(p("<<ALL FILES>>").covers(&p("/etc/passwd")));
        assert!(!p("/-").covers(&p("<<ALL FILES>>")));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(p("/etc//hosts/"), PathPattern::Exact("/etc/hosts".to_string()));
        assert_eq!(p("/"), PathPattern::Exact("/".to_string()));
        assert!(PathPattern::parse("  ").is_none());
    }

    #[test]
    fn test_relative_patterns_stay_relative() {
        let cwd_tree = p("-");
        assert_eq!(cwd_tree, PathPattern::Recursive("./".to_string()));
        assert!(!cwd_tree.covers(&p("/etc/passwd")));
        assert!(!cwd_tree.covers(&p("/-")));
        assert!(cwd_tree.covers(&p("logs/gc.log")));
        assert!(cwd_tree.covers(&p("./logs/gc.log")));

        let cwd_files = p("*");
        assert!(!cwd_files.covers(&p("/passwd")));
        assert!(cwd_files.covers(&p("gc.log")));
        assert!(!cwd_files.covers(&p("logs/gc.log")));

        assert!(!p("/-").covers(&p("logs/gc.log")));
        assert!(p("logs/-").covers(&p("./logs/gc.log")));
    }

    #[test]
    fn test_display_roundtrips_shape() {
        assert_eq!(p("/a/b/-").to_string(), "/a/b/-");
        assert_eq!(p("/a/*").to_string(), "/a/*");
    }
}
