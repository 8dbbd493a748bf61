//! Core error taxonomy
//!
//! Every service returns these typed results; nothing here knows about HTTP.
//! Handlers map the kind to a status code and serialize kind + reason so the
//! peripheral layer can render an actionable message.

use sea_orm::DbErr;

/// Machine-readable sub-reason carried alongside the error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    Suspended,
    NotActive,
    NotEnded,
    AuctionClosed,
    PaymentRequired,
    PaymentPending,
    PaymentRejected,
    SelfBid,
    BelowCurrent,
    BelowIncrement,
    NotSeller,
    NotWinner,
    WrongAmount,
    AlreadyApproved,
    AlreadyRejected,
    DuplicateAuctionCode,
    DuplicateParticipationCode,
    DuplicatePayment,
    VersionConflict,
    MissingReserveFloor,
    MissingField,
    InvalidSchedule,
    EmptyNotes,
    NotReserveAuction,
    RequiresApproval,
}

impl ErrorReason {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorReason::Suspended => "SUSPENDED",
            ErrorReason::NotActive => "NOT_ACTIVE",
            ErrorReason::NotEnded => "NOT_ENDED",
            ErrorReason::AuctionClosed => "AUCTION_CLOSED",
            ErrorReason::PaymentRequired => "PAYMENT_REQUIRED",
            ErrorReason::PaymentPending => "PAYMENT_PENDING",
            ErrorReason::PaymentRejected => "PAYMENT_REJECTED",
            ErrorReason::SelfBid => "SELF_BID",
            ErrorReason::BelowCurrent => "BELOW_CURRENT",
            ErrorReason::BelowIncrement => "BELOW_INCREMENT",
            ErrorReason::NotSeller => "NOT_SELLER",
            ErrorReason::NotWinner => "NOT_WINNER",
            ErrorReason::WrongAmount => "WRONG_AMOUNT",
            ErrorReason::AlreadyApproved => "ALREADY_APPROVED",
            ErrorReason::AlreadyRejected => "ALREADY_REJECTED",
            ErrorReason::DuplicateAuctionCode => "DUPLICATE_AUCTION_CODE",
            ErrorReason::DuplicateParticipationCode => "DUPLICATE_PARTICIPATION_CODE",
            ErrorReason::DuplicatePayment => "DUPLICATE_PAYMENT",
            ErrorReason::VersionConflict => "VERSION_CONFLICT",
            ErrorReason::MissingReserveFloor => "MISSING_RESERVE_FLOOR",
            ErrorReason::MissingField => "MISSING_FIELD",
            ErrorReason::InvalidSchedule => "INVALID_SCHEDULE",
            ErrorReason::EmptyNotes => "EMPTY_NOTES",
            ErrorReason::NotReserveAuction => "NOT_RESERVE_AUCTION",
            ErrorReason::RequiresApproval => "REQUIRES_APPROVAL",
        }
    }
}

#[derive(Debug)]
pub enum CoreError {
    /// Entity missing
    NotFound { entity: &'static str, key: String },
    /// Operation not valid for the current lifecycle state
    InvalidState { reason: ErrorReason, message: String },
    /// Authorization or eligibility failure
    Forbidden { reason: ErrorReason, message: String },
    /// Malformed or out-of-range input
    InvalidArgument { reason: ErrorReason, message: String },
    /// Uniqueness violation
    Conflict { reason: ErrorReason, message: String },
    /// Data inconsistency blocking a pure calculation
    Configuration { reason: ErrorReason, message: String },
    /// Storage fault, not recoverable by the caller
    Database(DbErr),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid_state(reason: ErrorReason, message: impl Into<String>) -> Self {
        CoreError::InvalidState {
            reason,
            message: message.into(),
        }
    }

    pub fn forbidden(reason: ErrorReason, message: impl Into<String>) -> Self {
        CoreError::Forbidden {
            reason,
            message: message.into(),
        }
    }

    pub fn invalid_argument(reason: ErrorReason, message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            reason,
            message: message.into(),
        }
    }

    pub fn conflict(reason: ErrorReason, message: impl Into<String>) -> Self {
        CoreError::Conflict {
            reason,
            message: message.into(),
        }
    }

    pub fn configuration(reason: ErrorReason, message: impl Into<String>) -> Self {
        CoreError::Configuration {
            reason,
            message: message.into(),
        }
    }

    /// Error kind as a stable code, e.g. for API responses
    pub fn kind_code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::InvalidState { .. } => "INVALID_STATE",
            CoreError::Forbidden { .. } => "FORBIDDEN",
            CoreError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            CoreError::Conflict { .. } => "CONFLICT",
            CoreError::Configuration { .. } => "CONFIGURATION",
            CoreError::Database(_) => "DATABASE",
        }
    }

    /// Sub-reason code when the kind carries one
    pub fn reason_code(&self) -> &'static str {
        match self {
            CoreError::InvalidState { reason, .. }
            | CoreError::Forbidden { reason, .. }
            | CoreError::InvalidArgument { reason, .. }
            | CoreError::Conflict { reason, .. }
            | CoreError::Configuration { reason, .. } => reason.code(),
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Database(_) => "DATABASE",
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::NotFound { entity, key } => write!(f, "{} {} not found", entity, key),
            CoreError::InvalidState { reason, message } => {
                write!(f, "invalid state ({}): {}", reason.code(), message)
            }
            CoreError::Forbidden { reason, message } => {
                write!(f, "forbidden ({}): {}", reason.code(), message)
            }
            CoreError::InvalidArgument { reason, message } => {
                write!(f, "invalid argument ({}): {}", reason.code(), message)
            }
            CoreError::Conflict { reason, message } => {
                write!(f, "conflict ({}): {}", reason.code(), message)
            }
            CoreError::Configuration { reason, message } => {
                write!(f, "configuration error ({}): {}", reason.code(), message)
            }
            CoreError::Database(err) => write!(f, "database error: {}", err),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        CoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_reason_codes() {
        let err = CoreError::forbidden(ErrorReason::Suspended, "account suspended");
        assert_eq!(err.kind_code(), "FORBIDDEN");
        assert_eq!(err.reason_code(), "SUSPENDED");

        let err = CoreError::not_found("auction", 42);
        assert_eq!(err.kind_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "auction 42 not found");
    }
}
