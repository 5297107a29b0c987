//! Newline-delimited JSON audit sink.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use crate::record::AuditRecord;
use crate::sink::{AuditError, AuditSink, relock};

/// Serializes each record as one JSON object followed by `\n`.
#[derive(Debug)]
pub struct JsonLinesAuditSink<W = Stdout> {
    out: Mutex<W>,
}

impl JsonLinesAuditSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesAuditSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> AuditSink for JsonLinesAuditSink<W> {
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        // Serialize before locking so a bad record never holds the writer.
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let mut out = relock(&self.out);
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OperationKind;
    use tellr_core::AccountId;

    #[test]
    fn each_record_is_one_parseable_line() {
        let sink = JsonLinesAuditSink::new(Vec::new());
        let id = AccountId::new("acct-9").unwrap();
        sink.record_operation(AuditRecord::new(id.clone(), OperationKind::Deposit, 25.5, 125.5))
            .unwrap();
        sink.record_operation(AuditRecord::new(id, OperationKind::Withdraw, 5.5, 120.0))
            .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let parsed: Vec<AuditRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].key(), ("acct-9", OperationKind::Deposit, 25.5));
        assert_eq!(parsed[1].key(), ("acct-9", OperationKind::Withdraw, 5.5));
        assert_eq!(parsed[1].balance_after, 120.0);
    }
}
