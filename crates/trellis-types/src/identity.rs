//! Component identities
//!
//! A `ClassIdentity` is the fully-qualified class name of a component, written
//! with the namespace separator (`Service\PaymentBean`). It is the key under
//! which a descriptor lives in a registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between namespace segments of a class identity
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Errors raised when building a class identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("class identity is empty")]
    Empty,

    #[error("class identity {identity:?} has an empty namespace segment")]
    EmptySegment { identity: String },

    #[error("class identity {identity:?} contains whitespace")]
    Whitespace { identity: String },
}

/// Fully-qualified component class name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassIdentity(String);

impl ClassIdentity {
    /// Build an identity, normalising `/` to the namespace separator and
    /// dropping a leading separator (`\Service\Bean` == `Service\Bean`).
    pub fn new(name: impl Into<String>) -> Result<Self, IdentityError> {
        let name: String = name.into();
        let normalized = name
            .replace('/', &NAMESPACE_SEPARATOR.to_string())
            .trim_start_matches(NAMESPACE_SEPARATOR)
            .to_string();

        if normalized.is_empty() {
            return Err(IdentityError::Empty);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(IdentityError::Whitespace {
                identity: normalized,
            });
        }
        if normalized.split(NAMESPACE_SEPARATOR).any(str::is_empty) {
            return Err(IdentityError::EmptySegment {
                identity: normalized,
            });
        }

        Ok(Self(normalized))
    }

    /// Build an identity from namespace segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self, IdentityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&NAMESPACE_SEPARATOR.to_string());
        Self::new(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(NAMESPACE_SEPARATOR)
    }

    /// The class name without its namespace
    pub fn short_name(&self) -> &str {
        self.segments().last().unwrap_or(&self.0)
    }

    /// The namespace without the class name, if any
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .rfind(NAMESPACE_SEPARATOR)
            .map(|idx| &self.0[..idx])
    }
}

impl fmt::Display for ClassIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClassIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClassIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassIdentity> for String {
    fn from(id: ClassIdentity) -> Self {
        id.0
    }
}

impl AsRef<str> for ClassIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_separators() {
        let id = ClassIdentity::new("/Service/PaymentBean").unwrap();
        assert_eq!(id.as_str(), "Service\\PaymentBean");
        assert_eq!(id.short_name(), "PaymentBean");
        assert_eq!(id.namespace(), Some("Service"));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(ClassIdentity::new(""), Err(IdentityError::Empty));
        assert_eq!(ClassIdentity::new("\\"), Err(IdentityError::Empty));
    }

    #[test]
    fn test_rejects_empty_segment() {
        assert!(matches!(
            ClassIdentity::new("Service\\\\Bean"),
            Err(IdentityError::EmptySegment { .. })
        ));
        assert!(matches!(
            ClassIdentity::new("Service\\"),
            Err(IdentityError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_from_segments() {
        let id = ClassIdentity::from_segments(["App", "Service", "Bean"]).unwrap();
        assert_eq!(id.to_string(), "App\\Service\\Bean");
        assert_eq!(id.segments().count(), 3);
        assert!(ClassIdentity::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let id: ClassIdentity = serde_json::from_str("\"Service/Bean\"").unwrap();
        assert_eq!(id.as_str(), "Service\\Bean");
        assert!(serde_json::from_str::<ClassIdentity>("\"\"").is_err());
    }
}
