use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{DocumentType, NumberingMode};

/// Errors surfaced by numbering, VAT, and audit operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NumberingError {
    /// Number format template failed validation.
    #[error("invalid number format {template:?}: {reason}")]
    InvalidFormat { template: String, reason: String },

    /// VAT rate outside the accepted range.
    #[error("invalid VAT rate {rate}: must be a fraction between 0 and 1")]
    InvalidRate { rate: Decimal },

    /// A rate history entry already exists for this effective date.
    #[error("a VAT rate entry effective {date} already exists")]
    DuplicateEffectiveDate { date: NaiveDate },

    /// VAT registration without a VAT number.
    #[error("a VAT number is required while VAT registered")]
    MissingVatNumber,

    /// Voiding requires a non-blank reason.
    #[error("voiding a number requires a reason")]
    MissingReason,

    /// Gap tolerance outside the accepted range of 0 to 365 days.
    #[error("gap tolerance of {days} days is out of range (0 to 365)")]
    InvalidTolerance { days: u32 },

    /// Manual number was blank.
    #[error("manual {doc_type} number must not be blank")]
    EmptyNumber { doc_type: DocumentType },

    /// The number already exists in the audit ledger.
    #[error("{doc_type} number {number:?} has already been issued")]
    DuplicateNumber {
        doc_type: DocumentType,
        number: String,
    },

    /// Concurrent writers kept conflicting and the retry budget ran out.
    #[error("could not allocate a {doc_type} number after {attempts} attempts")]
    AllocationConflict { doc_type: DocumentType, attempts: u32 },

    /// The sequence counter has no next value.
    #[error("the {doc_type} sequence for {year} is exhausted")]
    SequenceExhausted { doc_type: DocumentType, year: i32 },

    /// Manual numbers are not permitted under the tenant's settings.
    #[error("manual numbers are not allowed in {mode} mode")]
    ManualNotAllowed { mode: NumberingMode },

    /// Manual document is dated further back than the tenant tolerates.
    #[error(
        "{doc_type} number {number:?} dated {document_date} exceeds the gap tolerance of {tolerance_days} days"
    )]
    GapToleranceExceeded {
        doc_type: DocumentType,
        number: String,
        document_date: NaiveDate,
        tolerance_days: u32,
    },

    /// No audit record exists for this number.
    #[error("{doc_type} number {number:?} not found in the audit ledger")]
    NumberNotFound {
        doc_type: DocumentType,
        number: String,
    },

    /// The number has already been voided.
    #[error("{doc_type} number {number:?} is already voided")]
    AlreadyVoided {
        doc_type: DocumentType,
        number: String,
    },

    /// Backend storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend returned state the library cannot interpret.
    #[error("corrupt storage state: {0}")]
    Corrupt(String),

    /// Optimistic write conflict with a concurrent update.
    #[error("storage write conflicted with a concurrent update")]
    Conflict,
}

/// Coarse error classification for host-application handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input is wrong; retrying unchanged cannot succeed.
    Validation,
    /// A concurrent writer interfered; the same call may be retried.
    Conflict,
    /// The operation does not apply to the record's current state.
    State,
    /// The backend failed; surface to operators.
    Storage,
}

impl ErrorClass {
    /// Whether retrying the same operation unchanged can succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorClass::Conflict)
    }
}

impl NumberingError {
    /// Stable machine-readable code, usable as a UI translation key.
    pub fn code(&self) -> &'static str {
        match self {
            NumberingError::InvalidFormat { .. } => "INVALID_FORMAT",
            NumberingError::InvalidRate { .. } => "INVALID_RATE",
            NumberingError::DuplicateEffectiveDate { .. } => "DUPLICATE_EFFECTIVE_DATE",
            NumberingError::MissingVatNumber => "MISSING_VAT_NUMBER",
            NumberingError::MissingReason => "MISSING_REASON",
            NumberingError::InvalidTolerance { .. } => "INVALID_TOLERANCE",
            NumberingError::EmptyNumber { .. } => "EMPTY_NUMBER",
            NumberingError::DuplicateNumber { .. } => "DUPLICATE_NUMBER",
            NumberingError::AllocationConflict { .. } => "ALLOCATION_CONFLICT",
            NumberingError::SequenceExhausted { .. } => "SEQUENCE_EXHAUSTED",
            NumberingError::ManualNotAllowed { .. } => "MANUAL_NOT_ALLOWED",
            NumberingError::GapToleranceExceeded { .. } => "GAP_TOLERANCE_EXCEEDED",
            NumberingError::NumberNotFound { .. } => "NUMBER_NOT_FOUND",
            NumberingError::AlreadyVoided { .. } => "ALREADY_VOIDED",
            NumberingError::Store(_) => "STORE_ERROR",
        }
    }

    /// Classify the error for handling and retry decisions.
    pub fn class(&self) -> ErrorClass {
        match self {
            NumberingError::InvalidFormat { .. }
            | NumberingError::InvalidRate { .. }
            | NumberingError::MissingVatNumber
            | NumberingError::MissingReason
            | NumberingError::InvalidTolerance { .. }
            | NumberingError::EmptyNumber { .. } => ErrorClass::Validation,
            NumberingError::AllocationConflict { .. }
            | NumberingError::Store(StoreError::Conflict) => ErrorClass::Conflict,
            NumberingError::DuplicateEffectiveDate { .. }
            | NumberingError::DuplicateNumber { .. }
            | NumberingError::SequenceExhausted { .. }
            | NumberingError::ManualNotAllowed { .. }
            | NumberingError::GapToleranceExceeded { .. }
            | NumberingError::NumberNotFound { .. }
            | NumberingError::AlreadyVoided { .. } => ErrorClass::State,
            NumberingError::Store(_) => ErrorClass::Storage,
        }
    }
}
