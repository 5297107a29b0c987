//! Account error model.

use thiserror::Error;

/// Result type used by every account operation.
pub type AccountResult<T> = Result<T, AccountError>;

/// Rejection of a single account call.
///
/// Every variant is a normal, expected outcome reported to the immediate caller.
/// None of them leave the account unusable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountError {
    /// Non-positive or non-finite amount, or bad construction input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Withdrawal larger than the current balance.
    #[error("insufficient funds: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    /// The audit sink refused the record.
    ///
    /// `committed` tells whether the balance change stayed in place.
    #[error("audit sink failed (committed: {committed}): {reason}")]
    AuditFailed { committed: bool, reason: String },
}

impl AccountError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn insufficient_funds(requested: f64, available: f64) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }

    pub fn audit_failed(committed: bool, reason: impl Into<String>) -> Self {
        Self::AuditFailed {
            committed,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }
}

/// Validate a deposit/withdraw amount: strictly positive and finite.
///
/// `NaN` fails the `> 0.0` comparison, so it is rejected here as well.
pub fn ensure_positive_amount(amount: f64, operation: &str) -> AccountResult<()> {
    if amount > 0.0 && amount.is_finite() {
        Ok(())
    } else {
        Err(AccountError::invalid_argument(format!(
            "{operation} amount must be > 0 (got {amount})"
        )))
    }
}
