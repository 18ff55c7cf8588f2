//! Opaque continuation token issued by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a cursor token cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token was empty or whitespace.
    #[error("cursor must not be blank")]
    Blank,
}

/// Server-issued pagination token.
///
/// The portal never builds or inspects cursors; it only stores the value the
/// backend returned and sends it back on the next request.
///
/// # Examples
/// ```
/// use pagination::Cursor;
///
/// let cursor = Cursor::new("eyJpZCI6NX0").expect("non-blank cursor");
/// assert_eq!(cursor.as_str(), "eyJpZCI6NX0");
/// assert!(Cursor::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cursor(String);

impl Cursor {
    /// Accept a token returned by the backend.
    ///
    /// # Errors
    /// Returns [`CursorError::Blank`] when the token is empty after trimming.
    pub fn new(token: impl Into<String>) -> Result<Self, CursorError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CursorError::Blank);
        }
        Ok(Self(token))
    }

    /// Accept an optional token, treating blank values as "no more pages".
    #[must_use]
    pub fn from_optional(token: Option<&str>) -> Option<Self> {
        token.and_then(|raw| Self::new(raw).ok())
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Cursor> for String {
    fn from(value: Cursor) -> Self {
        value.0
    }
}

impl TryFrom<String> for Cursor {
    type Error = CursorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
