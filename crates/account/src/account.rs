use std::sync::{Mutex, MutexGuard, PoisonError};

use tellr_audit::{AuditError, AuditRecord, AuditSink, OperationKind};
use tellr_core::error::ensure_positive_amount;
use tellr_core::{AccountError, AccountId, AccountResult};

use crate::policy::AuditFailurePolicy;

/// A single balance with audited, mutually exclusive mutations.
///
/// Every public operation takes the same per-account lock for its whole
/// duration, audit call included: validate, mutate, then notify the sink.
/// Accounts never coordinate with each other.
#[derive(Debug)]
pub struct Account<S> {
    id: AccountId,
    balance: Mutex<f64>,
    sink: S,
    policy: AuditFailurePolicy,
}

impl<S: AuditSink> Account<S> {
    /// Open an account with the default failure policy (`Rollback`).
    ///
    /// Fails with `InvalidArgument` for a blank id or a non-finite balance.
    /// Negative finite balances are accepted.
    pub fn new(id: impl Into<String>, initial_balance: f64, sink: S) -> AccountResult<Self> {
        let id = AccountId::new(id)?;
        Self::open(id, initial_balance, sink, AuditFailurePolicy::default())
    }

    pub fn builder() -> AccountBuilder<S> {
        AccountBuilder::default()
    }

    fn open(
        id: AccountId,
        initial_balance: f64,
        sink: S,
        policy: AuditFailurePolicy,
    ) -> AccountResult<Self> {
        if !initial_balance.is_finite() {
            return Err(AccountError::invalid_argument(format!(
                "initial balance must be finite (got {initial_balance})"
            )));
        }

        tracing::debug!(account_id = %id, initial_balance, %policy, "account opened");

        Ok(Self {
            id,
            balance: Mutex::new(initial_balance),
            sink,
            policy,
        })
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Current balance, read under the account lock.
    pub fn balance(&self) -> f64 {
        *self.lock()
    }

    pub fn audit_sink(&self) -> &S {
        &self.sink
    }

    pub fn failure_policy(&self) -> AuditFailurePolicy {
        self.policy
    }

    /// Add a strictly positive `amount`; returns the new balance.
    pub fn deposit(&self, amount: f64) -> AccountResult<f64> {
        ensure_positive_amount(amount, "Deposit").inspect_err(|e| self.rejected(e))?;

        let mut balance = self.lock();
        let previous = *balance;
        let updated = previous + amount;
        if !updated.is_finite() {
            let err = AccountError::invalid_argument(format!(
                "Deposit of {amount} would overflow balance {previous}"
            ));
            self.rejected(&err);
            return Err(err);
        }
        *balance = updated;
        self.notify(&mut balance, previous, OperationKind::Deposit, amount)
    }

    /// Subtract a strictly positive `amount` not exceeding the balance; returns
    /// the new balance.
    pub fn withdraw(&self, amount: f64) -> AccountResult<f64> {
        ensure_positive_amount(amount, "Withdraw").inspect_err(|e| self.rejected(e))?;

        let mut balance = self.lock();
        let previous = *balance;
        if amount > previous {
            let err = AccountError::insufficient_funds(amount, previous);
            self.rejected(&err);
            return Err(err);
        }
        *balance = previous - amount;
        self.notify(&mut balance, previous, OperationKind::Withdraw, amount)
    }

    // A panicking sink poisons the lock; the f64 behind it is still whole.
    fn lock(&self) -> MutexGuard<'_, f64> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand the record to the sink while the lock is still held, then apply the
    /// failure policy if the sink refused it.
    fn notify(
        &self,
        balance: &mut MutexGuard<'_, f64>,
        previous: f64,
        kind: OperationKind,
        amount: f64,
    ) -> AccountResult<f64> {
        let current = **balance;
        let record = AuditRecord::new(self.id.clone(), kind, amount, current);

        match self.sink.record_operation(record) {
            Ok(()) => {
                tracing::debug!(account_id = %self.id, op = %kind, amount, balance = current, "operation applied");
                Ok(current)
            }
            Err(err) => self.audit_failed(balance, previous, kind, amount, err),
        }
    }

    fn audit_failed(
        &self,
        balance: &mut MutexGuard<'_, f64>,
        previous: f64,
        kind: OperationKind,
        amount: f64,
        err: AuditError,
    ) -> AccountResult<f64> {
        match self.policy {
            AuditFailurePolicy::Rollback => {
                **balance = previous;
                tracing::warn!(account_id = %self.id, op = %kind, amount, error = %err, "audit failed; operation rolled back");
                Err(AccountError::audit_failed(false, err.to_string()))
            }
            AuditFailurePolicy::Propagate => {
                tracing::warn!(account_id = %self.id, op = %kind, amount, error = %err, "audit failed; operation kept");
                Err(AccountError::audit_failed(true, err.to_string()))
            }
            AuditFailurePolicy::Ignore => {
                tracing::warn!(account_id = %self.id, op = %kind, amount, error = %err, "audit failed; ignored");
                Ok(**balance)
            }
        }
    }

    fn rejected(&self, err: &AccountError) {
        tracing::debug!(account_id = %self.id, error = %err, "operation rejected");
    }
}

/// Step-by-step construction of an [`Account`].
///
/// `build` enforces the construction contract: an id and a sink must both be
/// present, the id must not be blank and the balance must be finite.
#[derive(Debug)]
pub struct AccountBuilder<S> {
    id: Option<String>,
    initial_balance: f64,
    sink: Option<S>,
    policy: AuditFailurePolicy,
}

impl<S> Default for AccountBuilder<S> {
    fn default() -> Self {
        Self {
            id: None,
            initial_balance: 0.0,
            sink: None,
            policy: AuditFailurePolicy::default(),
        }
    }
}

impl<S: AuditSink> AccountBuilder<S> {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn initial_balance(mut self, balance: f64) -> Self {
        self.initial_balance = balance;
        self
    }

    pub fn audit_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn failure_policy(mut self, policy: AuditFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> AccountResult<Account<S>> {
        let id = AccountId::new(self.id.unwrap_or_default())?;
        let sink = self
            .sink
            .ok_or_else(|| AccountError::invalid_argument("audit sink required"))?;
        Account::open(id, self.initial_balance, sink, self.policy)
    }
}
