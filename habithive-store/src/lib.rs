//! Record store boundary for HabitHive.
//!
//! The authoritative copy of a user's habits lives in an external, per-user
//! record store. The core depends only on the contract here:
//!
//! - [`RecordStore`] — create / partial update / subscribe-for-changes
//! - [`Subscription`] — a push channel delivering the full current snapshot
//!   on every committed mutation, own or foreign
//!
//! [`MemoryStore`] is the in-tree reference implementation. It gives the
//! sync controller and its tests a faithful stand-in for the remote
//! backend, including write-failure and subscription-error injection.

mod error;
mod memory_store;
mod record_store;

pub use error::{StoreError, StoreResult};
pub use memory_store::MemoryStore;
pub use record_store::{RecordStore, SnapshotResult, Subscription};
