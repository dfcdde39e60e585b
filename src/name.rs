//! Canonical domain names
//!
//! A [`Name`] is always lower-cased and fully qualified. All comparisons inside
//! the tree work on this form, so `Sub.Example.JP` and `sub.example.jp.` are the
//! same name.

use std::fmt;

use crate::errors::{TreeError, TreeResult};

/// Longest label allowed in a domain name, in octets.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest domain name allowed in wire form, in octets.
pub const MAX_NAME_LEN: usize = 255;

/// A domain name in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    /// Canonicalizes `name`: ASCII lower-case plus a single trailing dot.
    ///
    /// No other structure is touched; use [`Name::parse`] to reject malformed input.
    pub fn new(name: &str) -> Self {
        let mut canonical = name.to_ascii_lowercase();
        if !canonical.ends_with('.') {
            canonical.push('.');
        }
        Self(canonical)
    }

    /// The root name `.`.
    pub fn root() -> Self {
        Self(".".to_string())
    }

    /// Canonicalizes and validates `name`.
    pub fn parse(name: &str) -> TreeResult<Self> {
        let parsed = Self::new(name);
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks label and total lengths and rejects empty labels.
    pub fn validate(&self) -> TreeResult<()> {
        let invalid = |reason: String| TreeError::InvalidName {
            name: self.0.clone(),
            reason,
        };

        if self.is_root() {
            return Ok(());
        }
        let mut wire_len = 1;
        for label in self.labels() {
            if label.is_empty() {
                return Err(invalid("empty label".to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(invalid(format!(
                    "label '{}' exceeds {} octets",
                    label, MAX_LABEL_LEN
                )));
            }
            wire_len += label.len() + 1;
        }
        if wire_len > MAX_NAME_LEN {
            return Err(invalid(format!(
                "name is {} octets, max is {}",
                wire_len, MAX_NAME_LEN
            )));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    /// Labels leftmost first: `sub.example.jp.` gives `["sub", "example", "jp"]`.
    /// The root name has no labels.
    pub fn labels(&self) -> Vec<&str> {
        if self.is_root() {
            return Vec::new();
        }
        self.0[..self.0.len() - 1].split('.').collect()
    }

    /// Number of labels, without splitting the name.
    pub fn label_count(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.matches('.').count()
        }
    }

    /// Leftmost label, `None` for the root name.
    pub fn first_label(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.split('.').next()
    }

    /// True if `self` equals `parent` or lies below it.
    pub fn is_subdomain_of(&self, parent: &Name) -> bool {
        if parent.is_root() || self.0 == parent.0 {
            return true;
        }
        match self.0.strip_suffix(parent.0.as_str()) {
            Some(rest) => rest.ends_with('.'),
            None => false,
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}
