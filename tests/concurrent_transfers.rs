//! Concurrency scenarios for the transfer coordinator.
//!
//! Every test runs on the multi-threaded runtime so tasks really race for the
//! account locks.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;

use lockstep_transfer::{
    AccountId, AccountRepository, AccountsService, CancelSignal, InMemoryAccountRepository,
    LockPolicy, LoggingNotifier, MonetaryAccount, TransferCoordinator, TransferError,
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn account(id: &str, balance: &str) -> Arc<MonetaryAccount> {
    Arc::new(MonetaryAccount::open(id, dec(balance)).unwrap())
}

/// Generous budget: contention resolves well inside it
fn patient_policy() -> LockPolicy {
    LockPolicy::new(100, Duration::from_millis(100), Duration::from_millis(1))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn eight_concurrent_transfers_a_to_b() {
    for _run in 0..3 {
        let a = account("A", "1000.00");
        let b = account("B", "500.00");
        let coordinator = Arc::new(TransferCoordinator::new(LockPolicy::default()));

        let tasks = (0..8).map(|_| {
            let (a, b, coordinator) = (a.clone(), b.clone(), coordinator.clone());
            tokio::spawn(async move { coordinator.transfer(&a, &b, dec("100.00")).await })
        });

        for res in join_all(tasks).await {
            res.unwrap().expect("every transfer should succeed");
        }

        assert_eq!(a.balance().await, dec("200.00"));
        assert_eq!(b.balance().await, dec("1300.00"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn insufficient_funds_leaves_balances() {
    let a = account("A", "50");
    let b = account("B", "500");
    let coordinator = TransferCoordinator::new(LockPolicy::default());

    let err = coordinator.transfer(&a, &b, dec("100")).await.unwrap_err();
    assert!(matches!(err, TransferError::InsufficientFunds { .. }));
    assert_eq!(err.code(), "INSUFFICIENT_FUNDS");

    assert_eq!(a.balance().await, dec("50"));
    assert_eq!(b.balance().await, dec("500"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn invalid_amounts_never_touch_locks() {
    let a = account("A", "1000");
    let b = account("B", "500");
    let coordinator = TransferCoordinator::new(LockPolicy::default());

    for amount in [dec("0"), dec("-5"), dec("-0.01")] {
        assert_eq!(
            coordinator.transfer(&a, &b, amount).await.unwrap_err(),
            TransferError::InvalidAmount
        );
        assert_eq!(
            coordinator.transfer(&b, &a, amount).await.unwrap_err(),
            TransferError::InvalidAmount
        );
    }

    assert_eq!(a.lock_attempts(), 0);
    assert_eq!(b.lock_attempts(), 0);
    assert_eq!(a.balance().await, dec("1000"));
    assert_eq!(b.balance().await, dec("500"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn alternating_directions_never_deadlock() {
    let a = account("A", "10000");
    let b = account("B", "10000");
    // Tight budget: some transfers may give up, none may hang
    let coordinator = Arc::new(TransferCoordinator::new(LockPolicy::new(
        3,
        Duration::from_millis(5),
        Duration::from_millis(1),
    )));

    let tasks = (0..200).map(|i| {
        let (from, to) = if i % 2 == 0 {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.transfer(&from, &to, dec("3")).await })
    });

    let results = tokio::time::timeout(Duration::from_secs(20), join_all(tasks))
        .await
        .expect("transfers must all terminate");

    for res in results {
        match res.unwrap() {
            Ok(_) | Err(TransferError::LockAcquisitionFailure { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(a.balance().await + b.balance().await, dec("20000"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn conservation_between_two_accounts() {
    let a = account("A", "750.25");
    let b = account("B", "249.75");
    let coordinator = Arc::new(TransferCoordinator::new(patient_policy()));
    let total_before = a.balance().await + b.balance().await;

    let amounts = ["0.01", "12.5", "3", "99.99", "0.5", "42", "7.77", "1"];
    let tasks = (0..64).map(|i| {
        let (from, to) = if i % 3 == 0 {
            (b.clone(), a.clone())
        } else {
            (a.clone(), b.clone())
        };
        let amount = dec(amounts[i % amounts.len()]);
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.transfer(&from, &to, amount).await })
    });

    for res in join_all(tasks).await {
        match res.unwrap() {
            // Either side may run dry depending on scheduling
            Ok(_) | Err(TransferError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let (fa, fb) = (a.balance().await, b.balance().await);
    assert!(fa >= Decimal::ZERO && fb >= Decimal::ZERO);
    assert_eq!(fa + fb, total_before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn overlapping_ring_of_accounts_conserves_total() {
    let ids = ["acc-0", "acc-1", "acc-2", "acc-3", "acc-4"];
    let accounts: Vec<_> = ids.iter().map(|id| account(id, "1000")).collect();
    let coordinator = Arc::new(TransferCoordinator::new(patient_policy()));

    // Each task touches a neighbouring pair; pairs overlap around the ring
    let tasks = (0..150).map(|i| {
        let n = accounts.len();
        let x = i % n;
        let y = (x + 1 + (i / n) % (n - 1)) % n;
        let (from, to) = if i % 2 == 0 { (x, y) } else { (y, x) };
        let (from, to) = (accounts[from].clone(), accounts[to].clone());
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.transfer(&from, &to, dec("5")).await })
    });

    let results = tokio::time::timeout(Duration::from_secs(20), join_all(tasks))
        .await
        .expect("no deadlock across overlapping pairs");
    for res in results {
        res.unwrap().expect("patient budget should absorb contention");
    }

    let mut total = Decimal::ZERO;
    for acc in &accounts {
        total += acc.balance().await;
    }
    assert_eq!(total, dec("5000"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lock_held_externally_exhausts_retries() {
    let a = account("A", "100");
    let b = account("B", "100");
    let policy = LockPolicy::new(3, Duration::from_millis(10), Duration::from_millis(5));
    let coordinator = TransferCoordinator::new(policy);

    let cancel = CancelSignal::new();
    let held = b
        .acquire_with_retries(&policy, &cancel)
        .await
        .unwrap()
        .expect("free lock");

    // Held for longer than max_attempts * attempt_timeout
    let err = coordinator.transfer(&a, &b, dec("10")).await.unwrap_err();
    assert_eq!(
        err,
        TransferError::LockAcquisitionFailure {
            account: b.id().clone(),
            attempts: 3
        }
    );
    assert_eq!(err.http_status(), 409);
    drop(held);

    assert_eq!(a.balance().await, dec("100"));
    assert_eq!(b.balance().await, dec("100"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancelled_transfer_mutates_nothing() {
    let a = account("A", "100");
    let b = account("B", "100");
    let coordinator = Arc::new(TransferCoordinator::new(LockPolicy::new(
        10_000,
        Duration::from_millis(50),
        Duration::from_millis(10),
    )));

    let holder = CancelSignal::new();
    let held = a
        .acquire_with_retries(&LockPolicy::default(), &holder)
        .await
        .unwrap()
        .expect("free lock");

    let cancel = Arc::new(CancelSignal::new());
    let task = {
        let (a, b, coordinator, cancel) = (a.clone(), b.clone(), coordinator.clone(), cancel.clone());
        tokio::spawn(async move {
            coordinator
                .transfer_cancellable(&b, &a, dec("10"), &cancel)
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();

    let res = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("cancellation must end the wait")
        .unwrap();
    assert_eq!(
        res.unwrap_err(),
        TransferError::Cancelled {
            account: a.id().clone()
        }
    );
    drop(held);

    assert_eq!(a.balance().await, dec("100"));
    assert_eq!(b.balance().await, dec("100"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn service_resolves_shared_instances() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let service = Arc::new(AccountsService::new(
        repo.clone(),
        TransferCoordinator::new(patient_policy()),
        Arc::new(LoggingNotifier),
    ));
    service.create_account("Id-130", dec("8000")).unwrap();
    service.create_account("Id-131", dec("16000")).unwrap();

    let from = AccountId::new("Id-130").unwrap();
    let to = AccountId::new("Id-131").unwrap();

    let tasks = (0..20).map(|i| {
        let service = service.clone();
        let (f, t) = if i % 2 == 0 {
            (from.clone(), to.clone())
        } else {
            (to.clone(), from.clone())
        };
        tokio::spawn(async move { service.transfer_amount(&f, &t, dec("500")).await })
    });
    for res in join_all(tasks).await {
        res.unwrap().unwrap();
    }

    // Ten each way: net zero
    assert_eq!(service.balance_of(&from).await.unwrap(), dec("8000"));
    assert_eq!(service.balance_of(&to).await.unwrap(), dec("16000"));

    // Every lookup saw the same account, so the counters add up on one instance
    let shared = repo.find(&from).unwrap();
    assert_eq!(shared.lock_acquisitions(), 20);
}

#[tokio::test]
async fn self_transfer_is_rejected() {
    let a = account("A", "100");
    let coordinator = TransferCoordinator::new(LockPolicy::default());

    let err = coordinator.transfer(&a, &a, dec("1")).await.unwrap_err();
    assert_eq!(err, TransferError::SameAccount(a.id().clone()));
    assert_eq!(err.code(), "SAME_ACCOUNT");
    assert_eq!(a.lock_attempts(), 0);
    assert_eq!(a.balance().await, dec("100"));
}
