//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rps_escrow_core::{EscrowError, LedgerError};

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// The escrow rejected the operation
    Escrow(EscrowError),
    /// Missing or malformed X-Account-Id header
    MissingCaller,
}

impl From<EscrowError> for ApiError {
    fn from(err: EscrowError) -> Self {
        ApiError::Escrow(err)
    }
}

fn escrow_status(err: &EscrowError) -> StatusCode {
    match err {
        EscrowError::UnknownCommitment(_) => StatusCode::NOT_FOUND,
        EscrowError::UnauthorizedParty(_) | EscrowError::SelfMatchForbidden => {
            StatusCode::FORBIDDEN
        }
        EscrowError::DirectValueTransferForbidden => StatusCode::METHOD_NOT_ALLOWED,
        EscrowError::Ledger(LedgerError::InsufficientFunds { .. }) => StatusCode::PAYMENT_REQUIRED,
        EscrowError::DuplicateOrConflictingCommitment(_)
        | EscrowError::AlreadyMatched
        | EscrowError::AlreadyRevealed(_)
        | EscrowError::ChallengeNotMatched
        | EscrowError::ChallengeExpired { .. }
        | EscrowError::ChallengeClosed
        | EscrowError::GameNotYetResolved
        | EscrowError::ZeroCreditedBalance
        | EscrowError::DeadlineNotReached { .. }
        | EscrowError::NothingToReclaim => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::Escrow(err) => (escrow_status(err), err.kind(), err.to_string()),
            ApiError::MissingCaller => (
                StatusCode::UNAUTHORIZED,
                "missing_caller",
                "Missing or invalid X-Account-Id header".to_string(),
            ),
        };

        (
            status,
            Json(serde_json::json!({"error": message, "kind": kind})),
        )
            .into_response()
    }
}
