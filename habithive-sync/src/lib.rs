//! Sync controller for HabitHive.
//!
//! Bridges the pure streak engine and the external record store for one
//! user session. The controller owns the authoritative-for-display habit
//! list: it subscribes to the store, replaces the list wholesale on every
//! pushed snapshot, and turns toggle/create commands into partial-field
//! writes computed by the engine. No local-only state survives a push —
//! the last pushed snapshot always wins — which keeps the view eventually
//! consistent under repeated and out-of-order deliveries.

mod controller;
mod error;
mod session;
mod view;

pub use controller::{
    Command, ControllerConfig, ControllerEvent, ControllerHandle, Notice, SyncController,
    create_controller,
};
pub use error::{SyncError, SyncResult};
pub use session::{IdentityProvider, Session, StaticIdentity};
pub use view::{DailyProgress, HabitView};
