//! Audit sink backed by the process-wide `tracing` subscriber.

use crate::record::AuditRecord;
use crate::sink::{AuditError, AuditSink};

/// Emits one `info` event per record under the `tellr::audit` target.
///
/// Where the events end up (JSON, pretty, nowhere) is decided by whoever
/// installed the subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        tracing::info!(
            target: "tellr::audit",
            account_id = %record.account_id,
            op = %record.kind,
            amount = record.amount,
            balance_after = record.balance_after,
            recorded_at = %record.recorded_at,
            "account operation recorded"
        );
        Ok(())
    }
}
