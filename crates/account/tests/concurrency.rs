use std::sync::Arc;
use std::thread;

use tellr_account::{Account, AuditFailurePolicy};
use tellr_audit::{AuditSink, InMemoryAuditSink, OperationKind};

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 500;

#[test]
fn concurrent_deposits_sum_exactly() {
    let account = Account::new("shared", 0.0, InMemoryAuditSink::new()).unwrap();

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..OPS_PER_THREAD {
                    account.deposit(1.0).unwrap();
                }
            });
        }
    });

    let expected = (THREADS * OPS_PER_THREAD) as f64;
    assert_eq!(account.balance(), expected);
    assert_eq!(account.audit_sink().len(), THREADS * OPS_PER_THREAD);
}

#[test]
fn concurrent_withdrawals_never_overdraw() {
    let initial = 1_000.0;
    let account = Account::new("drain", initial, InMemoryAuditSink::new()).unwrap();

    let succeeded: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    let mut ok = 0;
                    for _ in 0..OPS_PER_THREAD {
                        match account.withdraw(1.0) {
                            Ok(_) => ok += 1,
                            Err(e) => assert!(e.is_insufficient_funds()),
                        }
                    }
                    ok
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(succeeded, 1_000);
    assert_eq!(account.balance(), 0.0);
    assert_eq!(account.audit_sink().len(), 1_000);
}

#[test]
fn audit_trail_follows_lock_order() {
    // Each record's balance_after must chain from the previous one, which only
    // holds if the sink is notified inside the same critical section.
    let account = Account::new("chain", 10_000.0, InMemoryAuditSink::new()).unwrap();

    thread::scope(|s| {
        for i in 0..THREADS {
            let account = &account;
            s.spawn(move || {
                for _ in 0..OPS_PER_THREAD {
                    if i % 2 == 0 {
                        account.deposit(2.0).unwrap();
                    } else {
                        account.withdraw(1.0).unwrap();
                    }
                }
            });
        }
    });

    let mut running = 10_000.0;
    for record in account.audit_sink().records() {
        match record.kind {
            OperationKind::Deposit => running += record.amount,
            OperationKind::Withdraw => running -= record.amount,
        }
        assert_eq!(record.balance_after, running);
    }
    assert_eq!(account.balance(), running);
}

#[test]
fn accounts_can_share_one_sink() {
    let c_trail = Arc::new(InMemoryAuditSink::new());
    let sink: Arc<dyn AuditSink> = c_trail.clone();
    let trail = Arc::new(InMemoryAuditSink::new());

    let a = Account::new("a", 0.0, Arc::clone(&trail)).unwrap();
    let b = Account::new("b", 0.0, Arc::clone(&trail)).unwrap();
    let c = Account::new("c", 5.0, sink).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..OPS_PER_THREAD {
                a.deposit(1.0).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..OPS_PER_THREAD {
                b.deposit(1.0).unwrap();
            }
        });
    });
    c.withdraw(5.0).unwrap();

    let records = trail.records();
    assert_eq!(records.len(), 2 * OPS_PER_THREAD);
    assert_eq!(records.iter().filter(|r| r.account_id.as_str() == "a").count(), OPS_PER_THREAD);
    assert_eq!(a.balance(), OPS_PER_THREAD as f64);
    assert_eq!(b.balance(), OPS_PER_THREAD as f64);
    assert_eq!(c.balance(), 0.0);
    assert_eq!(c_trail.len(), 1);
    assert_eq!(c_trail.records()[0].key(), ("c", OperationKind::Withdraw, 5.0));
}

#[test]
fn rollback_under_contention_keeps_balance_and_trail_aligned() {
    let account = Account::builder()
        .id("flaky")
        .initial_balance(0.0)
        .audit_sink(InMemoryAuditSink::new())
        .failure_policy(AuditFailurePolicy::Rollback)
        .build()
        .unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..OPS_PER_THREAD {
                let _ = account.deposit(1.0);
            }
        });
        s.spawn(|| {
            for i in 0..OPS_PER_THREAD {
                if i % 2 == 0 {
                    account.audit_sink().fail_with("flapping");
                } else {
                    account.audit_sink().recover();
                }
            }
        });
    });

    let recorded: f64 = account.audit_sink().records().iter().map(|r| r.amount).sum();
    assert_eq!(account.balance(), recorded);
}
