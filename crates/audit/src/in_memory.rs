//! In-memory audit trail for tests/dev.

use std::sync::{Mutex, mpsc};
use std::time::Duration;

use crate::record::AuditRecord;
use crate::sink::{AuditError, AuditSink, relock};

/// Ordered, in-process audit trail.
///
/// - Records are kept in arrival order
/// - Subscribers get a copy of every record accepted after they subscribed
/// - `fail_with` switches the sink into rejecting mode (for failure-path tests)
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
    subscribers: Mutex<Vec<mpsc::Sender<AuditRecord>>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every accepted record, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        relock(&self.records).clone()
    }

    pub fn len(&self) -> usize {
        relock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        relock(&self.records).is_empty()
    }

    pub fn clear(&self) {
        relock(&self.records).clear();
    }

    /// Reject every following record with `reason` until [`recover`](Self::recover).
    pub fn fail_with(&self, reason: impl Into<String>) {
        *relock(&self.failure) = Some(reason.into());
    }

    pub fn recover(&self) {
        *relock(&self.failure) = None;
    }

    pub fn subscribe(&self) -> AuditSubscription {
        let (tx, rx) = mpsc::channel();
        relock(&self.subscribers).push(tx);
        AuditSubscription { receiver: rx }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        if let Some(reason) = relock(&self.failure).clone() {
            return Err(AuditError::Rejected(reason));
        }

        // Drop any dead subscribers while publishing.
        relock(&self.subscribers).retain(|tx| tx.send(record.clone()).is_ok());
        relock(&self.records).push(record);
        Ok(())
    }
}

/// Live feed of records accepted by an [`InMemoryAuditSink`].
#[derive(Debug)]
pub struct AuditSubscription {
    receiver: mpsc::Receiver<AuditRecord>,
}

impl AuditSubscription {
    pub fn try_recv(&self) -> Result<AuditRecord, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<AuditRecord, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything received so far, without blocking.
    pub fn drain(&self) -> Vec<AuditRecord> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OperationKind;
    use tellr_core::AccountId;

    fn record(amount: f64) -> AuditRecord {
        AuditRecord::new(
            AccountId::new("acct-1").unwrap(),
            OperationKind::Deposit,
            amount,
            amount,
        )
    }

    #[test]
    fn keeps_records_in_order() {
        let sink = InMemoryAuditSink::new();
        for amount in [1.0, 2.0, 3.0] {
            sink.record_operation(record(amount)).unwrap();
        }

        let amounts: Vec<f64> = sink.records().iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
        assert_eq!(sink.len(), 3);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn rejecting_mode_stores_nothing_until_recovered() {
        let sink = InMemoryAuditSink::new();
        sink.fail_with("disk full");

        let err = sink.record_operation(record(1.0)).unwrap_err();
        assert!(matches!(err, AuditError::Rejected(ref r) if r == "disk full"));
        assert!(sink.is_empty());

        sink.recover();
        sink.record_operation(record(2.0)).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn subscribers_receive_later_records_only() {
        let sink = InMemoryAuditSink::new();
        sink.record_operation(record(1.0)).unwrap();

        let sub = sink.subscribe();
        sink.record_operation(record(2.0)).unwrap();
        sink.record_operation(record(3.0)).unwrap();

        let seen: Vec<f64> = sub.drain().iter().map(|r| r.amount).collect();
        assert_eq!(seen, vec![2.0, 3.0]);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let sink = InMemoryAuditSink::new();
        drop(sink.subscribe());
        sink.record_operation(record(1.0)).unwrap();
        assert!(relock(&sink.subscribers).is_empty());
    }
}
