//! Audit record produced by a successful account mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tellr_core::AccountId;

/// Which mutation produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Deposit,
    Withdraw,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
        }
    }
}

impl core::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed operation, handed to the sink and then forgotten by the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub account_id: AccountId,
    pub kind: OperationKind,
    /// Validated operation amount (always positive).
    pub amount: f64,
    /// Balance once the mutation is applied.
    pub balance_after: f64,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(account_id: AccountId, kind: OperationKind, amount: f64, balance_after: f64) -> Self {
        Self {
            account_id,
            kind,
            amount,
            balance_after,
            recorded_at: Utc::now(),
        }
    }

    /// `(id, kind, amount)` triple, convenient for assertions.
    pub fn key(&self) -> (&str, OperationKind, f64) {
        (self.account_id.as_str(), self.kind, self.amount)
    }
}
