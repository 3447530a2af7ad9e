//! Classpath parsing.

use std::env;
use std::ffi::OsStr;

use gatekeeper_core::Origin;

use crate::error::{PolicyError, Result};

/// Split a classpath on the platform path separator.
///
/// An empty string yields no entries. An empty element anywhere else is an
/// error: it usually comes from a stray separator in a launch script and
/// would otherwise put the working directory on the classpath.
pub fn parse_classpath(classpath: &str) -> Result<Vec<Origin>> {
    if classpath.is_empty() {
        return Ok(Vec::new());
    }

    env::split_paths(OsStr::new(classpath))
        .enumerate()
        .map(|(index, element)| {
            if element.as_os_str().is_empty() {
                Err(PolicyError::EmptyClasspathElement {
                    classpath: classpath.to_string(),
                    index,
                })
            } else {
                Ok(Origin::from(element.as_path()))
            }
        })
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_separator() {
        let entries = parse_classpath("/opt/gk/lib/core.jar:/opt/gk/lib/jna.jar").unwrap();
        assert_eq!(
            entries,
            vec![
                Origin::new("/opt/gk/lib/core.jar"),
                Origin::new("/opt/gk/lib/jna.jar"),
            ]
        );
    }

    #[test]
    fn test_empty_classpath() {
        assert!(parse_classpath("").unwrap().is_empty());
    }

    #[test]
    fn test_empty_elements_rejected() {
        for bad in [":/a.jar", "/a.jar:", "/a.jar::/b.jar"] {
            let err = parse_classpath(bad).unwrap_err();
            assert!(
                matches!(err, PolicyError::EmptyClasspathElement { .. }),
                "{bad:?} should be rejected"
            );
        }
    }
}
