//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA), used for commits and trees alike
//!
//! # Validation
//!
//! Object ids are validated at construction time, so an `Oid` held anywhere
//! in the crate is always well-formed hex of a known hash length.
//!
//! # Examples
//!
//! ```
//! use treesame::core::types::Oid;
//!
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! assert_eq!(oid.short(7), "abc123d");
//!
//! assert!(Oid::new("not-a-sha").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use treesame::core::types::Oid;
///
/// // Create from hex string (normalized to lowercase)
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
///
/// // Get abbreviated form
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Length of the abbreviated id used in changelog lines.
    pub const SHORT_LEN: usize = 7;

    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Oid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
