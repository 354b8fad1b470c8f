//! The record store contract consumed by the sync controller.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use habithive_types::{Habit, HabitDraft, HabitId, HabitPatch, UserId};
use tokio::sync::mpsc;

/// One delivery on a subscription: a full snapshot of the user's
/// collection, or a transport-level error. After an error the local list is
/// stale until the next snapshot arrives; the subscription itself stays up.
pub type SnapshotResult = Result<Vec<Habit>, StoreError>;

/// The authoritative, per-user habit collection.
///
/// Writes are partial: `update` touches only the fields listed in the
/// patch, and the store applies that field set last-write-wins per call —
/// there is no field-level merge across two concurrent updates to the same
/// habit. Subscribers receive the full current snapshot, in commit order,
/// after every mutation (their own or a foreign device's).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a habit and returns its newly assigned id.
    async fn create(&self, user_id: UserId, draft: HabitDraft) -> StoreResult<HabitId>;

    /// Applies a partial update to one habit. Fields absent from the patch
    /// are untouched.
    async fn update(
        &self,
        user_id: UserId,
        habit_id: &HabitId,
        patch: HabitPatch,
    ) -> StoreResult<()>;

    /// Opens a push channel scoped to `user_id`. The current snapshot is
    /// delivered immediately; every subsequent committed mutation delivers
    /// a fresh one.
    fn subscribe(&self, user_id: UserId) -> Subscription;
}

/// Push channel handle for one subscriber.
///
/// Dropping the handle releases the channel; [`Subscription::unsubscribe`]
/// does the same explicitly. Consuming the handle makes a double
/// unsubscribe unrepresentable, and the store prunes the dead sender on its
/// next push.
pub struct Subscription {
    rx: mpsc::Receiver<SnapshotResult>,
}

impl Subscription {
    /// Wraps the receiving end of a store's push channel.
    pub fn new(rx: mpsc::Receiver<SnapshotResult>) -> Self {
        Self { rx }
    }

    /// Waits for the next delivery. `None` means the store closed the
    /// channel (store shutdown).
    pub async fn recv(&mut self) -> Option<SnapshotResult> {
        self.rx.recv().await
    }

    /// Releases the push channel.
    pub fn unsubscribe(mut self) {
        self.rx.close();
    }
}
