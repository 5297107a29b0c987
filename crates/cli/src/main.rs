//! `tellr` — scripted session against one account.
//!
//! ```text
//! TELLR_INITIAL_BALANCE=0 tellr +50 -20 -100
//! ```
//!
//! `+N` deposits, `-N` withdraws. Without arguments the session withdraws 30,
//! 20 and 50 from the initial balance.

mod script;

use std::sync::Arc;

use anyhow::{Context, Result};

use tellr_account::{Account, AuditFailurePolicy};
use tellr_audit::{AuditSink, ConsoleAuditSink, JsonLinesAuditSink, TracingAuditSink};

use crate::script::Step;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn audit_sink_from_env() -> Arc<dyn AuditSink> {
    match env_or("TELLR_AUDIT_SINK", "console").as_str() {
        "json" => Arc::new(JsonLinesAuditSink::stdout()),
        "tracing" => Arc::new(TracingAuditSink),
        "console" => Arc::new(ConsoleAuditSink::stdout()),
        other => {
            tracing::warn!(sink = other, "unknown TELLR_AUDIT_SINK; using console");
            Arc::new(ConsoleAuditSink::stdout())
        }
    }
}

fn main() -> Result<()> {
    tellr_observability::init();

    let initial: f64 = env_or("TELLR_INITIAL_BALANCE", "100")
        .parse()
        .context("TELLR_INITIAL_BALANCE must be a number")?;
    let policy: AuditFailurePolicy = env_or("TELLR_AUDIT_FAILURE_POLICY", "rollback")
        .parse()
        .context("invalid TELLR_AUDIT_FAILURE_POLICY")?;
    let id = std::env::var("TELLR_ACCOUNT_ID").unwrap_or_else(|_| "acct-1".to_string());

    let steps = script::parse_args(std::env::args().skip(1))?;

    let account = Account::builder()
        .id(id)
        .initial_balance(initial)
        .audit_sink(audit_sink_from_env())
        .failure_policy(policy)
        .build()
        .context("failed to open account")?;

    tracing::info!(account_id = %account.id(), initial, steps = steps.len(), "session started");

    for step in steps {
        let outcome = match step {
            Step::Deposit(amount) => account.deposit(amount),
            Step::Withdraw(amount) => account.withdraw(amount),
        };
        if let Err(err) = outcome {
            println!("rejected {step}: {err}");
        }
    }

    println!("final balance for {}: {:.2}", account.id(), account.balance());
    Ok(())
}
