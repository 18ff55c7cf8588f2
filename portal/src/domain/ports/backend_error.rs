//! Failure vocabulary shared by every backend-facing port.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors surfaced while talking to the backend REST API.
    pub enum BackendError {
        /// The request never produced a response.
        Transport { message: String } =>
            "backend unreachable: {message}",
        /// The backend did not answer within the configured timeout.
        Timeout { message: String } =>
            "backend timed out: {message}",
        /// The backend answered with a non-success status.
        ///
        /// `message` is the text the backend supplied, shown to staff
        /// verbatim.
        Status { status: u16, message: String } =>
            "{message}",
        /// The response body was not the JSON the portal expected.
        Decode { message: String } =>
            "backend response could not be decoded: {message}",
        /// The adapter refused to build the request.
        InvalidRequest { message: String } =>
            "backend request invalid: {message}",
    }
}

impl BackendError {
    /// HTTP status reported by the backend, if it answered.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<BackendError> for Error {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Status { status, message } => Self::from_status(status, message),
            BackendError::Transport { .. } | BackendError::Timeout { .. } => {
                Self::service_unavailable(error.to_string())
            }
            BackendError::Decode { .. } => Self::internal(error.to_string()),
            BackendError::InvalidRequest { message } => Self::invalid_request(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(BackendError::status(400_u16, "bad"), ErrorCode::InvalidRequest, "bad")]
    #[case(BackendError::status(422_u16, "nope"), ErrorCode::InvalidRequest, "nope")]
    #[case(BackendError::status(401_u16, "who"), ErrorCode::Unauthorized, "who")]
    #[case(BackendError::status(403_u16, "no"), ErrorCode::Forbidden, "no")]
    #[case(BackendError::status(404_u16, "gone"), ErrorCode::NotFound, "gone")]
    #[case(BackendError::status(409_u16, "dup"), ErrorCode::Conflict, "dup")]
    #[case(BackendError::status(503_u16, "down"), ErrorCode::ServiceUnavailable, "down")]
    #[case(
        BackendError::transport("refused"),
        ErrorCode::ServiceUnavailable,
        "backend unreachable: refused"
    )]
    #[case(
        BackendError::timeout("30s"),
        ErrorCode::ServiceUnavailable,
        "backend timed out: 30s"
    )]
    fn error_kind_follows_status(
        #[case] error: BackendError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.message(), message);
    }

    #[rstest]
    fn status_is_exposed_only_for_answers() {
        assert_eq!(BackendError::status(404_u16, "x").http_status(), Some(404));
        assert_eq!(BackendError::decode("eof").http_status(), None);
    }
}
