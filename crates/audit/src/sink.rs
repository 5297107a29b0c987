//! Audit sink contract.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::record::AuditRecord;

/// Failure reported by a sink.
///
/// The account decides what a failure means for the balance (see its failure
/// policy); sinks only report.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("audit record rejected: {0}")]
    Rejected(String),
}

/// Records completed account operations.
///
/// Called synchronously by the account while it holds its own lock. One sink may
/// be shared by many accounts, so implementations handle their own thread
/// safety.
///
/// The sinks in this crate recover a lock poisoned by a panicking writer and
/// keep accepting records. A panic mid-write can leave one partial line behind;
/// it never disables the sink for the accounts sharing it.
pub trait AuditSink: Send + Sync {
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError>;
}

impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        (**self).record_operation(record)
    }
}

impl<S> AuditSink for Box<S>
where
    S: AuditSink + ?Sized,
{
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        (**self).record_operation(record)
    }
}

impl<S> AuditSink for &S
where
    S: AuditSink + ?Sized,
{
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        (**self).record_operation(record)
    }
}

// Guarded sink state (writers, vectors) stays usable after a panic.
pub(crate) fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink that accepts and drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_operation(&self, _record: AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}
