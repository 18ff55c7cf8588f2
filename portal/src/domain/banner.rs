//! Transient success and error messages shown above a screen.

use serde::Serialize;

use super::{Error, ErrorCode};

const SUCCESS_PREFIX: &str = "✓ ";

/// Banner colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    /// Green confirmation after a mutation.
    Success,
    /// Red failure text.
    Error,
}

/// A message attached to a view.
///
/// # Examples
/// ```
/// use portal::domain::{Banner, Error};
///
/// assert_eq!(Banner::success("Payment recorded").message(), "✓ Payment recorded");
/// assert_eq!(Banner::error(&Error::forbidden("no access")).message(), "no access");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    kind: BannerKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

impl Banner {
    /// Success banner; the check mark is added once.
    pub fn success(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.starts_with(SUCCESS_PREFIX) {
            message
        } else {
            format!("{SUCCESS_PREFIX}{message}")
        };
        Self {
            kind: BannerKind::Success,
            message,
            code: None,
        }
    }

    /// Error banner carrying the server's message.
    pub fn error(error: &Error) -> Self {
        Self {
            kind: BannerKind::Error,
            message: error.message().to_owned(),
            code: Some(error.code()),
        }
    }

    /// Banner colour.
    pub fn kind(&self) -> BannerKind {
        self.kind
    }

    /// Display text.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Error code behind an error banner.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Whether this is an error banner.
    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn success_prefix_is_not_doubled() {
        assert_eq!(Banner::success("✓ Done").message(), "✓ Done");
    }

    #[rstest]
    fn error_banner_keeps_code() {
        let banner = Banner::error(&Error::from_status(409, "already paid"));
        assert!(banner.is_error());
        assert_eq!(banner.code(), Some(ErrorCode::Conflict));
        assert_eq!(banner.message(), "already paid");
    }
}
