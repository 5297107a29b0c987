//! Audit trail for account operations.
//!
//! The account only knows the [`AuditSink`] contract; everything else in this
//! crate is an implementation of it:
//!
//! - [`ConsoleAuditSink`]: human-readable line per record (development aid)
//! - [`JsonLinesAuditSink`]: one JSON object per line
//! - [`TracingAuditSink`]: structured `tracing` event per record
//! - [`InMemoryAuditSink`]: ordered in-process trail, for tests and dev
//! - [`NoopAuditSink`]: discards everything

pub mod console;
pub mod in_memory;
pub mod json_lines;
pub mod record;
pub mod sink;
pub mod tracing_sink;

pub use console::ConsoleAuditSink;
pub use in_memory::{AuditSubscription, InMemoryAuditSink};
pub use json_lines::JsonLinesAuditSink;
pub use record::{AuditRecord, OperationKind};
pub use sink::{AuditError, AuditSink, NoopAuditSink};
pub use tracing_sink::TracingAuditSink;
