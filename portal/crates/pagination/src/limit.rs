//! Page size clamped to the range the backend accepts.

use serde::{Deserialize, Serialize};

/// Number of rows requested per page.
///
/// Values outside `MIN..=MAX` are clamped rather than rejected; the backend
/// applies the same bounds and the portal mirrors them so requests never ask
/// for something the server will refuse.
///
/// # Examples
/// ```
/// use pagination::PageLimit;
///
/// assert_eq!(PageLimit::new(0).get(), 1);
/// assert_eq!(PageLimit::new(75).get(), 75);
/// assert_eq!(PageLimit::new(5_000).get(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PageLimit(u32);

impl PageLimit {
    /// Smallest page the backend serves.
    pub const MIN: u32 = 1;
    /// Largest page the backend serves.
    pub const MAX: u32 = 200;
    /// Page size used when a screen does not ask for one.
    pub const DEFAULT: Self = Self(50);

    /// Build a limit, clamping into `MIN..=MAX`.
    #[must_use]
    pub const fn new(requested: u32) -> Self {
        if requested < Self::MIN {
            Self(Self::MIN)
        } else if requested > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(requested)
        }
    }

    /// Raw row count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for PageLimit {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<PageLimit> for u32 {
    fn from(value: PageLimit) -> Self {
        value.0
    }
}
