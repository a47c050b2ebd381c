//! Error taxonomy for the attendance core and its HTTP mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the attendance state machine.
///
/// `StoreError::Duplicate` never appears here: the state machine always
/// translates it to `AlreadyCheckedIn` so callers see one consistent
/// conflict, whether the in-process check or the unique index caught it.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// A required input was absent. Caller error, surfaced verbatim.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// A record already exists for this employee today.
    #[error("Already checked in today")]
    AlreadyCheckedIn,

    /// The record has already been finalized; the first check-out's
    /// timestamp and photo are never overwritten.
    #[error("Already checked out")]
    AlreadyCheckedOut,

    /// The referenced record id does not exist.
    #[error("Record not found")]
    RecordNotFound { id: u64 },

    /// Infrastructure failure from the store. Retrying the whole operation
    /// is safe: uniqueness and the conditional update make both transitions
    /// duplicate-proof.
    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::MissingField { .. }
            | AttendanceError::AlreadyCheckedIn
            | AttendanceError::AlreadyCheckedOut => StatusCode::BAD_REQUEST,
            AttendanceError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            AttendanceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AttendanceError::Store(e) => {
                tracing::error!(error = %e, "attendance storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_errors_map_to_bad_request() {
        assert_eq!(
            AttendanceError::AlreadyCheckedIn.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::AlreadyCheckedOut.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::MissingField { field: "employeeId" }.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_record_maps_to_not_found() {
        assert_eq!(
            AttendanceError::RecordNotFound { id: 9 }.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn store_failures_hide_detail_from_the_client() {
        let err = AttendanceError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.error_response();
        assert_eq!(body.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn user_facing_messages_match_the_wire_contract() {
        assert_eq!(
            AttendanceError::AlreadyCheckedIn.to_string(),
            "Already checked in today"
        );
        assert_eq!(
            AttendanceError::MissingField { field: "recordId" }.to_string(),
            "recordId is required"
        );
    }
}
