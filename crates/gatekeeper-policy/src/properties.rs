//! `${name}` expansion for policy documents.
//!
//! Classpath entries contribute one `codebase.<file name>` property each,
//! letting a document scope grants to a jar without knowing where it lives.

use std::collections::BTreeMap;

use gatekeeper_core::Origin;

use crate::error::{PlaceholderError, PolicyError, Result};

/// Prefix of properties derived from classpath entries.
pub const CODEBASE_PREFIX: &str = "codebase.";

/// Properties available to `${name}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyProperties {
    values: BTreeMap<String, String>,
}

impl PolicyProperties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Add a `codebase.<file name>` property for every classpath entry.
    ///
    /// Fails if two entries share a file name.
    pub fn with_classpath(mut self, classpath: &[Origin]) -> Result<Self> {
        let mut seen: BTreeMap<&str, &Origin> = BTreeMap::new();
        for origin in classpath {
            let Some(name) = origin.file_name() else {
                continue;
            };
            if let Some(first) = seen.insert(name, origin) {
                return Err(PolicyError::DuplicateCodebase {
                    name: name.to_string(),
                    first: first.clone(),
                    second: origin.clone(),
                });
            }
            self.values
                .insert(format!("{}{}", CODEBASE_PREFIX, name), origin.as_str().to_string());
        }
        Ok(self)
    }

    /// Look up a property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replace every `${name}` in `input`.
    pub fn expand(&self, input: &str) -> std::result::Result<String, PlaceholderError> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| PlaceholderError::Unterminated(input.to_string()))?;
            let name = &after[..end];
            let value = self
                .get(name)
                .ok_or_else(|| PlaceholderError::Unknown(name.to_string()))?;
            out.push_str(value);
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

impl From<BTreeMap<String, String>> for PolicyProperties {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}
