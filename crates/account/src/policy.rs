//! What an account does when its audit sink reports a failure.

use serde::{Deserialize, Serialize};

/// Reaction to a failed `record_operation` call.
///
/// The sink is always called after the balance changed and while the account
/// lock is still held, so every policy is applied atomically with respect to
/// other callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditFailurePolicy {
    /// Restore the previous balance and report `AuditFailed { committed: false }`.
    #[default]
    Rollback,
    /// Keep the new balance and report `AuditFailed { committed: true }`.
    Propagate,
    /// Keep the new balance, log a warning, report success.
    Ignore,
}

impl AuditFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditFailurePolicy::Rollback => "rollback",
            AuditFailurePolicy::Propagate => "propagate",
            AuditFailurePolicy::Ignore => "ignore",
        }
    }
}

impl core::fmt::Display for AuditFailurePolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AuditFailurePolicy {
    type Err = tellr_core::AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rollback" => Ok(Self::Rollback),
            "propagate" => Ok(Self::Propagate),
            "ignore" => Ok(Self::Ignore),
            other => Err(tellr_core::AccountError::invalid_argument(format!(
                "unknown audit failure policy: {other}"
            ))),
        }
    }
}
