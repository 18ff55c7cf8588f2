//! The owner role works in a separate application.
//!
//! When its URL is configured the owner landing route redirects there;
//! otherwise the owner sees an informational view instead of an error.

use serde::Serialize;
use url::Url;

const UNAVAILABLE_MESSAGE: &str =
    "The owner portal is not configured for this installation. Ask an administrator for its address.";

/// Where the owner landing route leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OwnerPortal {
    /// Send the owner to the external application.
    Redirect {
        /// Absolute URL of the owner portal.
        url: String,
    },
    /// No owner portal is configured.
    Unavailable {
        /// Text shown instead.
        message: String,
    },
}

impl OwnerPortal {
    /// Decide from the configured URL.
    pub fn from_config(url: Option<&Url>) -> Self {
        match url {
            Some(url) => Self::Redirect {
                url: url.to_string(),
            },
            None => Self::Unavailable {
                message: UNAVAILABLE_MESSAGE.to_owned(),
            },
        }
    }
}
