//! In-memory reference implementation of the record store.
//!
//! Faithful to the remote backend the controller is written against:
//! per-user document collections, store-assigned ids, partial-field
//! updates, and a push of the full snapshot to every subscriber after each
//! committed mutation. Write-failure and subscription-error injection
//! stand in for the network and permission failures of the real thing.

use crate::error::{StoreError, StoreResult};
use crate::record_store::{RecordStore, SnapshotResult, Subscription};
use async_trait::async_trait;
use habithive_types::{Habit, HabitDraft, HabitId, HabitPatch, UserId};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of each subscriber's push channel.
const PUSH_BUFFER: usize = 64;

#[derive(Default)]
struct UserCollection {
    /// Documents in creation order, so snapshots have a stable list order.
    habits: Vec<Habit>,
    subscribers: Vec<mpsc::Sender<SnapshotResult>>,
}

impl UserCollection {
    fn snapshot(&self) -> Vec<Habit> {
        self.habits.clone()
    }

    /// Sends one delivery to every live subscriber, pruning dead ones.
    fn push(&mut self, delivery: SnapshotResult) {
        self.subscribers.retain(|tx| match tx.try_send(delivery.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("subscriber push buffer full, dropping delivery");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, UserCollection>,
    /// Error to fail the next write with, then cleared.
    fail_next_write: Option<StoreError>,
}

/// In-memory record store with snapshot push (for testing and single-node
/// embedding).
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create` or `update` fail with `err`, committing
    /// nothing and pushing nothing.
    pub fn fail_next_write(&self, err: StoreError) {
        self.inner.lock().unwrap().fail_next_write = Some(err);
    }

    /// Delivers a subscription error to the user's current subscribers, as
    /// a real backend does on a listener failure. The collection itself is
    /// untouched and later mutations push fresh snapshots as usual.
    pub fn push_error(&self, user_id: UserId, err: StoreError) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(collection) = inner.users.get_mut(&user_id) {
            collection.push(Err(err));
        }
    }

    /// The current committed snapshot of a user's collection.
    pub fn snapshot(&self, user_id: UserId) -> Vec<Habit> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .get(&user_id)
            .map(UserCollection::snapshot)
            .unwrap_or_default()
    }

    fn take_write_fault(inner: &mut Inner) -> StoreResult<()> {
        match inner.fail_next_write.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, user_id: UserId, draft: HabitDraft) -> StoreResult<HabitId> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_write_fault(&mut inner)?;

        // v7 ids are time-ordered, so mint order matches sort order.
        let id = HabitId::new(uuid::Uuid::now_v7().to_string());
        let collection = inner.users.entry(user_id).or_default();
        collection.habits.push(draft.into_habit(id.clone()));
        debug!(%user_id, habit_id = %id, "habit created");

        let snapshot = collection.snapshot();
        collection.push(Ok(snapshot));
        Ok(id)
    }

    async fn update(
        &self,
        user_id: UserId,
        habit_id: &HabitId,
        patch: HabitPatch,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::take_write_fault(&mut inner)?;

        let collection = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        let habit = collection
            .habits
            .iter_mut()
            .find(|h| &h.id == habit_id)
            .ok_or_else(|| StoreError::NotFound(habit_id.to_string()))?;

        *habit = habit.apply(&patch);
        debug!(%user_id, %habit_id, "habit updated");

        let snapshot = collection.snapshot();
        collection.push(Ok(snapshot));
        Ok(())
    }

    fn subscribe(&self, user_id: UserId) -> Subscription {
        let (tx, rx) = mpsc::channel(PUSH_BUFFER);
        let mut inner = self.inner.lock().unwrap();
        let collection = inner.users.entry(user_id).or_default();
        // First delivery: the current snapshot, even when empty. The fresh
        // channel has room, so this cannot fail.
        let _ = tx.try_send(Ok(collection.snapshot()));
        collection.subscribers.push(tx);
        debug!(%user_id, "subscription opened");
        Subscription::new(rx)
    }
}
