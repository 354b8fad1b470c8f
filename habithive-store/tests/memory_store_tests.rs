use habithive_store::{MemoryStore, RecordStore, StoreError, Subscription};
use habithive_types::{Habit, HabitDraft, HabitPatch, UserId};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::timeout;
use tokio_test::assert_ok;

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

async fn next_snapshot(sub: &mut Subscription) -> Vec<Habit> {
    timeout(RECV_TIMEOUT, sub.recv())
        .await
        .expect("timed out waiting for push")
        .expect("subscription closed")
        .expect("expected a snapshot, got an error")
}

async fn next_error(sub: &mut Subscription) -> StoreError {
    timeout(RECV_TIMEOUT, sub.recv())
        .await
        .expect("timed out waiting for push")
        .expect("subscription closed")
        .expect_err("expected an error, got a snapshot")
}

#[tokio::test]
async fn create_assigns_unique_ids_and_defaults() {
    let store = MemoryStore::new();
    let user = UserId::new();

    let a = assert_ok!(store.create(user, HabitDraft::new("Read", "20 pages")).await);
    let b = assert_ok!(store.create(user, HabitDraft::new("Run", "")).await);
    assert_ne!(a, b);

    let snapshot = store.snapshot(user);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].id, a);
    assert_eq!(snapshot[0].name, "Read");
    assert!(!snapshot[0].is_done_today);
    assert_eq!(snapshot[0].streak_days, 0);
    assert_eq!(snapshot[0].last_completed_date, None);
}

#[tokio::test]
async fn subscriber_gets_initial_snapshot_immediately() {
    let store = MemoryStore::new();
    let user = UserId::new();
    store.create(user, HabitDraft::new("Read", "")).await.unwrap();

    let mut sub = store.subscribe(user);
    let snapshot = next_snapshot(&mut sub).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "Read");
}

#[tokio::test]
async fn initial_snapshot_of_fresh_user_is_empty() {
    let store = MemoryStore::new();
    let mut sub = store.subscribe(UserId::new());
    assert_eq!(next_snapshot(&mut sub).await, vec![]);
}

#[tokio::test]
async fn every_mutation_pushes_a_full_snapshot() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let mut sub = store.subscribe(user);
    next_snapshot(&mut sub).await; // initial

    let id = store.create(user, HabitDraft::new("Read", "")).await.unwrap();
    assert_eq!(next_snapshot(&mut sub).await.len(), 1);

    store
        .update(
            user,
            &id,
            HabitPatch {
                is_done_today: Some(true),
                streak_days: Some(1),
                last_completed_date: Some("2024-03-11".parse().unwrap()),
            },
        )
        .await
        .unwrap();

    let snapshot = next_snapshot(&mut sub).await;
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot[0].is_done_today);
    assert_eq!(snapshot[0].streak_days, 1);
}

#[tokio::test]
async fn update_touches_only_listed_fields() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let id = store.create(user, HabitDraft::new("Read", "20 pages")).await.unwrap();

    store
        .update(
            user,
            &id,
            HabitPatch {
                streak_days: Some(3),
                last_completed_date: Some("2024-03-10".parse().unwrap()),
                ..HabitPatch::default()
            },
        )
        .await
        .unwrap();
    // Un-completion path: only the done flag is listed.
    store
        .update(
            user,
            &id,
            HabitPatch {
                is_done_today: Some(false),
                ..HabitPatch::default()
            },
        )
        .await
        .unwrap();

    let habit = &store.snapshot(user)[0];
    assert!(!habit.is_done_today);
    assert_eq!(habit.streak_days, 3);
    assert_eq!(habit.last_completed_date, Some("2024-03-10".parse().unwrap()));
    assert_eq!(habit.name, "Read");
    assert_eq!(habit.description, "20 pages");
}

#[tokio::test]
async fn foreign_mutation_reaches_every_subscriber() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let mut first = store.subscribe(user);
    let mut second = store.subscribe(user);
    next_snapshot(&mut first).await;
    next_snapshot(&mut second).await;

    // "Foreign" write: not issued through either subscription.
    store.create(user, HabitDraft::new("Read", "")).await.unwrap();

    assert_eq!(next_snapshot(&mut first).await.len(), 1);
    assert_eq!(next_snapshot(&mut second).await.len(), 1);
}

#[tokio::test]
async fn collections_are_partitioned_by_user() {
    let store = MemoryStore::new();
    let alice = UserId::new();
    let bob = UserId::new();
    let mut bob_sub = store.subscribe(bob);
    next_snapshot(&mut bob_sub).await;

    store.create(alice, HabitDraft::new("Read", "")).await.unwrap();

    assert!(store.snapshot(bob).is_empty());
    assert!(
        timeout(Duration::from_millis(50), bob_sub.recv()).await.is_err(),
        "bob must not see alice's mutation"
    );
}

#[tokio::test]
async fn unsubscribe_stops_delivery_without_disturbing_others() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let mut kept = store.subscribe(user);
    let dropped = store.subscribe(user);
    next_snapshot(&mut kept).await;
    dropped.unsubscribe();

    store.create(user, HabitDraft::new("Read", "")).await.unwrap();
    assert_eq!(next_snapshot(&mut kept).await.len(), 1);

    // The pruned channel is gone; another mutation still reaches the rest.
    store.create(user, HabitDraft::new("Run", "")).await.unwrap();
    assert_eq!(next_snapshot(&mut kept).await.len(), 2);
}

#[tokio::test]
async fn failed_write_commits_nothing_and_pushes_nothing() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let mut sub = store.subscribe(user);
    next_snapshot(&mut sub).await;

    store.fail_next_write(StoreError::Network("offline".to_string()));
    let err = store
        .create(user, HabitDraft::new("Read", ""))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::Network("offline".to_string()));
    assert!(store.snapshot(user).is_empty());
    assert!(
        timeout(Duration::from_millis(50), sub.recv()).await.is_err(),
        "a rejected write must not push"
    );

    // The fault is one-shot; the next write goes through.
    assert_ok!(store.create(user, HabitDraft::new("Read", "")).await);
    assert_eq!(next_snapshot(&mut sub).await.len(), 1);
}

#[tokio::test]
async fn update_of_unknown_habit_is_not_found() {
    let store = MemoryStore::new();
    let user = UserId::new();
    store.create(user, HabitDraft::new("Read", "")).await.unwrap();

    let err = store
        .update(user, &"missing".into(), HabitPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn pushed_error_does_not_tear_down_the_subscription() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let mut sub = store.subscribe(user);
    next_snapshot(&mut sub).await;

    store.push_error(user, StoreError::PermissionDenied("rules".to_string()));
    assert_eq!(
        next_error(&mut sub).await,
        StoreError::PermissionDenied("rules".to_string())
    );

    // A later mutation delivers a fresh snapshot on the same channel.
    store.create(user, HabitDraft::new("Read", "")).await.unwrap();
    assert_eq!(next_snapshot(&mut sub).await.len(), 1);
}

#[tokio::test]
async fn snapshots_keep_creation_order() {
    let store = MemoryStore::new();
    let user = UserId::new();
    for name in ["a", "b", "c"] {
        store.create(user, HabitDraft::new(name, "")).await.unwrap();
    }
    let names: Vec<_> = store.snapshot(user).into_iter().map(|h| h.name).collect();
    assert_eq!(names, ["a", "b", "c"]);
}
