//! Human-readable audit lines.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use crate::record::AuditRecord;
use crate::sink::{AuditError, AuditSink, relock};

/// Writes `AUDIT: account=<id>, op=<KIND>, amount=<0.00>` per record.
///
/// Development aid; nothing parses these lines.
#[derive(Debug)]
pub struct ConsoleAuditSink<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleAuditSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for ConsoleAuditSink<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> ConsoleAuditSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn format_line(record: &AuditRecord) -> String {
    format!(
        "AUDIT: account={}, op={}, amount={:.2}",
        record.account_id, record.kind, record.amount
    )
}

impl<W: Write + Send> AuditSink for ConsoleAuditSink<W> {
    fn record_operation(&self, record: AuditRecord) -> Result<(), AuditError> {
        let mut out = relock(&self.out);
        writeln!(out, "{}", format_line(&record))?;
        out.flush()?;
        Ok(())
    }
}
