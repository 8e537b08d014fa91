//! Concurrent operations tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_register_distinct_ranks() {
    let qm = setup();

    let mut handles = vec![];
    for user in 0..100i64 {
        let qm = qm.clone();
        handles.push(tokio::spawn(async move {
            qm.register_at("default", user, 1_000).await.unwrap()
        }));
    }

    for handle in handles {
        let rank = handle.await.unwrap();
        assert!((1..=100).contains(&rank));
    }

    // final ranks form a permutation of 1..=100
    let mut ranks = HashSet::new();
    for user in 0..100i64 {
        ranks.insert(qm.get_rank("default", user).await.unwrap());
    }
    assert_eq!(ranks.len(), 100);
    assert!(ranks.iter().all(|r| (1..=100).contains(r)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_register_single_winner() {
    let qm = setup();
    let successes = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..20 {
        let qm = qm.clone();
        let successes = successes.clone();
        let rejected = rejected.clone();
        handles.push(tokio::spawn(async move {
            match qm.register("default", 42).await {
                Ok(_) => successes.fetch_add(1, Ordering::Relaxed),
                Err(QueueError::AlreadyRegistered { .. }) => rejected.fetch_add(1, Ordering::Relaxed),
                Err(e) => panic!("unexpected error: {}", e),
            };
        }));
    }

    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(successes.load(Ordering::Relaxed), 1);
    assert_eq!(rejected.load(Ordering::Relaxed), 19);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_promote_moves_each_user_once() {
    let qm = setup();
    for user in 0..100i64 {
        qm.register_at("default", user, user as u64).await.unwrap();
    }

    let total = Arc::new(AtomicU64::new(0));
    let mut handles = vec![];
    for _ in 0..10 {
        let qm = qm.clone();
        let total = total.clone();
        handles.push(tokio::spawn(async move {
            let moved = qm.promote("default", 15).await.unwrap();
            assert!(moved <= 15);
            total.fetch_add(moved, Ordering::Relaxed);
        }));
    }

    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(total.load(Ordering::Relaxed), 100);
    assert_eq!(qm.waiting_count("default").await.unwrap(), 0);
    assert_eq!(qm.store.count(&proceed_key("default")).await.unwrap(), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_register_races_with_promote() {
    let qm = setup();

    let promoter = {
        let qm = qm.clone();
        tokio::spawn(async move {
            let mut moved = 0;
            for _ in 0..200 {
                moved += qm.promote("default", 5).await.unwrap();
                tokio::task::yield_now().await;
            }
            moved
        })
    };

    let mut handles = vec![];
    for user in 0..50i64 {
        let qm = qm.clone();
        handles.push(tokio::spawn(async move {
            let rank = qm.register("default", user).await.unwrap();
            assert!(rank == NOT_WAITING || rank >= 1);
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    let moved = promoter.await.unwrap();
    let rest = qm.promote("default", 100).await.unwrap();

    // every user is either promoted by the racer or by the final sweep, never both
    assert_eq!(moved + rest, 50);
    for user in 0..50i64 {
        assert_eq!(qm.get_rank("default", user).await.unwrap(), NOT_WAITING);
        assert!(qm.is_admitted("default", user).await.unwrap());
    }
}
