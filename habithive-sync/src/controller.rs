//! The sync controller event loop.
//!
//! One controller per user session. It subscribes to the record store,
//! projects pushed snapshots into view entities, and turns UI commands into
//! partial-field writes computed by the streak engine. Writes are fired
//! without waiting for the resulting push; the authoritative push is the
//! only thing that mutates the local list, so a failed write leaves state
//! exactly as the last snapshot left it and there is nothing to roll back.

use crate::error::{SyncError, SyncResult};
use crate::session::Session;
use crate::view::HabitView;
use habithive_store::RecordStore;
use habithive_streak::toggle_patch;
use habithive_types::{Clock, Habit, HabitDraft, HabitId};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Commands accepted by the controller.
#[derive(Debug)]
pub enum Command {
    /// Toggle today's completion for one habit.
    Toggle { habit_id: HabitId },
    /// Create a new habit (name already validated by the handle).
    Create { name: String, description: String },
    /// Stop the controller.
    Shutdown,
}

/// Events emitted for the UI.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// A fresh snapshot replaced the local list.
    Snapshot(Vec<HabitView>),
    /// The subscription reported an error. The list is stale until the
    /// next snapshot arrives; the session survives.
    SubscriptionError { reason: String },
    /// A transient, human-readable notice.
    Notice(Notice),
}

/// Transient user-visible notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    HabitAdded,
    AddFailed,
    UpdateFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::HabitAdded => "Habit added",
            Notice::AddFailed => "Failed to add habit",
            Notice::UpdateFailed => "Failed to update habit",
        };
        f.write_str(text)
    }
}

/// Configuration for the sync controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Command channel capacity.
    pub command_buffer: usize,
    /// UI event channel capacity.
    pub event_buffer: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            command_buffer: 64,
            event_buffer: 64,
        }
    }
}

/// Handle to send commands to a running controller.
#[derive(Clone)]
pub struct ControllerHandle {
    command_tx: mpsc::Sender<Command>,
}

impl ControllerHandle {
    /// Toggles today's completion for `habit_id`. A habit no longer in the
    /// list is treated as already reconciled and silently ignored.
    pub async fn toggle(&self, habit_id: HabitId) -> SyncResult<()> {
        self.command_tx
            .send(Command::Toggle { habit_id })
            .await
            .map_err(|_| SyncError::ChannelClosed)
    }

    /// Creates a habit. An empty or whitespace-only name fails here, before
    /// any store call; the stored name is the caller's original string.
    pub async fn create(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> SyncResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SyncError::EmptyHabitName);
        }
        self.command_tx
            .send(Command::Create {
                name,
                description: description.into(),
            })
            .await
            .map_err(|_| SyncError::ChannelClosed)
    }

    /// Stops the controller loop.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| SyncError::ChannelClosed)
    }
}

/// Creates a controller, its command handle, and the UI event receiver.
///
/// The caller spawns [`SyncController::run`]; dropping every handle also
/// stops the loop.
pub fn create_controller(
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    session: Session,
    config: ControllerConfig,
) -> (
    ControllerHandle,
    mpsc::Receiver<ControllerEvent>,
    SyncController,
) {
    let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
    let (event_tx, event_rx) = mpsc::channel(config.event_buffer);

    let handle = ControllerHandle { command_tx };
    let controller = SyncController {
        store,
        clock,
        session,
        habits: Vec::new(),
        command_rx,
        event_tx,
    };

    (handle, event_rx, controller)
}

/// The sync controller. Owns the authoritative-for-display habit list for
/// one user session.
pub struct SyncController {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    session: Session,
    /// Raw records from the last snapshot; replaced wholesale on every push.
    habits: Vec<Habit>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<ControllerEvent>,
}

impl SyncController {
    /// Runs the controller event loop until shutdown, until every handle is
    /// dropped, or until the store closes the subscription.
    pub async fn run(mut self) {
        info!(user_id = %self.session.user_id, "sync controller started");

        let mut subscription = self.store.subscribe(self.session.user_id);

        loop {
            tokio::select! {
                push = subscription.recv() => {
                    match push {
                        Some(Ok(records)) => {
                            debug!(count = records.len(), "snapshot applied");
                            self.habits = records;
                            let views: Vec<HabitView> =
                                self.habits.iter().map(HabitView::from).collect();
                            let _ = self.event_tx.send(ControllerEvent::Snapshot(views)).await;
                        }
                        Some(Err(e)) => {
                            warn!("subscription error: {e}");
                            let _ = self
                                .event_tx
                                .send(ControllerEvent::SubscriptionError {
                                    reason: e.to_string(),
                                })
                                .await;
                        }
                        None => {
                            info!("subscription closed, stopping controller");
                            break;
                        }
                    }
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Toggle { habit_id }) => self.handle_toggle(habit_id),
                        Some(Command::Create { name, description }) => {
                            self.handle_create(name, description);
                        }
                        Some(Command::Shutdown) | None => {
                            info!("sync controller shutting down");
                            break;
                        }
                    }
                }
            }
        }

        subscription.unsubscribe();
        info!(user_id = %self.session.user_id, "sync controller stopped");
    }

    /// Computes the toggle write for a habit and fires it. The local list is
    /// not touched here; the authoritative push that follows is what updates
    /// the display.
    fn handle_toggle(&self, habit_id: HabitId) {
        // The habit may have just been deleted remotely, in which case the
        // push that removed it already reconciled the list.
        let Some(habit) = self.habits.iter().find(|h| h.id == habit_id) else {
            debug!(%habit_id, "toggle for unknown habit ignored");
            return;
        };

        let today = self.clock.today();
        let yesterday = self.clock.yesterday();
        let patch = toggle_patch(habit, today, yesterday);

        let store = self.store.clone();
        let event_tx = self.event_tx.clone();
        let user_id = self.session.user_id;
        let id = habit.id.clone();
        // Fire-and-forget: a write still in flight at teardown completes
        // against the store, and its outcome dies with the event channel.
        tokio::spawn(async move {
            if let Err(e) = store.update(user_id, &id, patch).await {
                warn!(habit_id = %id, "habit update failed: {e}");
                let _ = event_tx
                    .send(ControllerEvent::Notice(Notice::UpdateFailed))
                    .await;
            }
        });
    }

    fn handle_create(&self, name: String, description: String) {
        let store = self.store.clone();
        let event_tx = self.event_tx.clone();
        let user_id = self.session.user_id;
        tokio::spawn(async move {
            let notice = match store.create(user_id, HabitDraft::new(name, description)).await {
                Ok(id) => {
                    debug!(habit_id = %id, "habit created");
                    Notice::HabitAdded
                }
                Err(e) => {
                    warn!("habit create failed: {e}");
                    Notice::AddFailed
                }
            };
            let _ = event_tx.send(ControllerEvent::Notice(notice)).await;
        });
    }
}
