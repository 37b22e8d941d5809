//! End-to-end tests for the full pipeline:
//! mutation engine → ledger store → notice bus → projection worker → view
//! store → queries.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use kontos_core::{AccountId, Money, UserId};
use kontos_events::{CommitNotice, InMemoryNoticeBus, NoticeBus};
use kontos_ledger::LedgerError;

use crate::config::Config;
use crate::engine::TransactionEngine;
use crate::projections::AccountSummaryProjection;
use crate::read_model::{InMemoryViewStore, SummaryQueries, SummaryView, ViewStore};
use crate::store::{InMemoryLedgerStore, LedgerStore};
use crate::workers::{ProjectionWorker, WorkerHandle};

type Bus = Arc<InMemoryNoticeBus<CommitNotice>>;
type Engine = TransactionEngine<Arc<InMemoryLedgerStore>, Bus>;

struct Harness {
    engine: Arc<Engine>,
    store: Arc<InMemoryLedgerStore>,
    views: Arc<InMemoryViewStore>,
    queries: SummaryQueries<Arc<InMemoryViewStore>>,
    bus: Bus,
    worker: Option<WorkerHandle>,
}

impl Harness {
    fn start(config: Config) -> Self {
        kontos_observability::init();

        let store = Arc::new(InMemoryLedgerStore::new());
        let views = Arc::new(InMemoryViewStore::new());
        let bus: Bus = Arc::new(InMemoryNoticeBus::new());

        let projection = Arc::new(AccountSummaryProjection::new(
            store.clone(),
            views.clone(),
            config.history_window,
        ));
        // The worker subscribes before any mutation runs, so no notice can
        // be missed.
        let worker = ProjectionWorker::spawn("summaries", bus.clone(), config.worker_tick(), {
            let projection = projection.clone();
            move |notice| projection.on_notice(notice)
        });

        let engine = Arc::new(TransactionEngine::new(store.clone(), bus.clone(), &config));
        let queries = SummaryQueries::new(views.clone());

        Self {
            engine,
            store,
            views,
            queries,
            bus,
            worker: Some(worker),
        }
    }

    fn await_summary(
        &self,
        account_id: &AccountId,
        pred: impl Fn(&SummaryView) -> bool,
    ) -> SummaryView {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let view = self.queries.summary(account_id);
            if pred(&view) {
                return view;
            }
            if Instant::now() >= deadline {
                panic!("projection did not converge in time: {view:?}");
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn stop(mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
        }
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

#[test]
fn full_flow_settles_debt_and_projects_the_summary() {
    let harness = Harness::start(Config::default());
    let account = harness.engine.open_account(UserId::new()).unwrap();
    let id = account.id();

    let balance = harness.engine.pay_bill(id, dec("150.00")).unwrap();
    assert_eq!(balance, money("-150.00"));

    let balance = harness.engine.deposit(id, dec("200.00")).unwrap();
    assert_eq!(balance, money("47.00"));

    let view = harness.await_summary(&id, |v| v.balance == "47.00" && v.history.len() == 3);

    // Newest first: audit deposit, debt settlement, original bill.
    assert_eq!(view.history[0].label, "deposit");
    assert_eq!(view.history[0].amount, "200.00");
    assert_eq!(view.history[1].label, "withdrawal");
    assert_eq!(view.history[1].amount, "153.00");
    assert_eq!(view.history[2].label, "withdrawal");
    assert_eq!(view.history[2].amount, "150.00");

    harness.stop();
}

#[test]
fn unmutated_accounts_read_as_the_empty_summary() {
    let harness = Harness::start(Config::default());

    let view = harness.queries.summary(&AccountId::new());

    assert_eq!(view.balance, "0.00");
    assert!(view.history.is_empty());
    harness.stop();
}

#[test]
fn rejected_mutations_leave_no_trace() {
    let harness = Harness::start(Config::default());
    let notices = harness.bus.subscribe();
    let account = harness.engine.open_account(UserId::new()).unwrap();

    let err = harness.engine.deposit(account.id(), dec("-5.00")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
    let err = harness.engine.pay_bill(account.id(), dec("0.00")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
    let err = harness.engine.deposit(AccountId::new(), dec("1.00")).unwrap_err();
    assert_eq!(err, LedgerError::AccountNotFound);

    assert!(harness
        .store
        .recent_entries(&account.id(), 10)
        .unwrap()
        .is_empty());
    assert!(notices.try_recv().is_err());
    harness.stop();
}

#[test]
fn duplicate_notices_converge_to_the_same_summary() {
    let harness = Harness::start(Config::default());
    let account = harness.engine.open_account(UserId::new()).unwrap();
    let id = account.id();

    harness.engine.deposit(id, dec("10.00")).unwrap();
    harness.await_summary(&id, |v| v.balance == "10.00");
    let before = serde_json::to_vec(&harness.views.get(&id).unwrap()).unwrap();

    // Replay the notice as an at-least-once transport would.
    harness.bus.publish(CommitNotice::new(id)).unwrap();
    thread::sleep(Duration::from_millis(150));

    let after = serde_json::to_vec(&harness.views.get(&id).unwrap()).unwrap();
    assert_eq!(before, after);
    harness.stop();
}

#[test]
fn concurrent_same_account_deposits_lose_no_updates() {
    let harness = Harness::start(Config::default());
    let account = harness.engine.open_account(UserId::new()).unwrap();
    let id = account.id();

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let engine = harness.engine.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    engine.deposit(id, dec("1.00")).unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let committed = harness.store.get_account(&id).unwrap();
    assert_eq!(committed.balance(), money("200.00"));

    // Without amortization the balance must equal the signed entry sum.
    let entries = harness.store.recent_entries(&id, 500).unwrap();
    assert_eq!(entries.len(), 200);
    let signed: Decimal = entries.iter().map(|e| e.signed_amount()).sum();
    assert_eq!(signed, committed.balance().as_decimal());

    harness.await_summary(&id, |v| v.balance == "200.00");
    harness.stop();
}

#[test]
fn accounts_mutate_independently() {
    let harness = Harness::start(Config::default());
    let first = harness.engine.open_account(UserId::new()).unwrap().id();
    let second = harness.engine.open_account(UserId::new()).unwrap().id();

    let a = {
        let engine = harness.engine.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                engine.deposit(first, dec("1.00")).unwrap();
            }
        })
    };
    let b = {
        let engine = harness.engine.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                engine.pay_bill(second, dec("1.00")).unwrap();
            }
        })
    };
    a.join().unwrap();
    b.join().unwrap();

    assert_eq!(
        harness.store.get_account(&first).unwrap().balance(),
        money("100.00")
    );
    assert_eq!(
        harness.store.get_account(&second).unwrap().balance(),
        money("-100.00")
    );
    harness.stop();
}

#[test]
fn lock_contention_surfaces_as_a_retryable_timeout() {
    let config = Config {
        lock_wait_ms: 50,
        ..Config::default()
    };
    let harness = Harness::start(config);
    let account = harness.engine.open_account(UserId::new()).unwrap();
    let id = account.id();

    let holder = {
        let store = harness.store.clone();
        thread::spawn(move || {
            store
                .with_account_for_update(&id, Duration::from_secs(1), &mut |current| {
                    thread::sleep(Duration::from_millis(400));
                    crate::store::AccountMutation {
                        new_balance: current.balance(),
                        entries: Vec::new(),
                    }
                })
                .unwrap();
        })
    };

    thread::sleep(Duration::from_millis(100));
    let err = harness.engine.deposit(id, dec("1.00")).unwrap_err();
    assert_eq!(err, LedgerError::LockTimeout);

    holder.join().unwrap();
    harness.stop();
}

#[test]
fn summaries_window_the_most_recent_entries() {
    let config = Config {
        history_window: 100,
        ..Config::default()
    };
    let harness = Harness::start(config);
    let account = harness.engine.open_account(UserId::new()).unwrap();
    let id = account.id();

    for _ in 0..105 {
        harness.engine.deposit(id, dec("1.00")).unwrap();
    }

    let view = harness.await_summary(&id, |v| v.balance == "105.00" && v.history.len() == 100);
    assert!(view.history.iter().all(|h| h.label == "deposit"));
    harness.stop();
}
