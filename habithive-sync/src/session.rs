//! Session identity for one controller instance.
//!
//! Auth state is an explicitly passed session context, not a process-wide
//! singleton, so a controller is testable against an injected store and
//! identity.

use habithive_types::UserId;
use std::sync::Mutex;

/// The identity a controller operates under.
///
/// `display_label` is an opaque display string (the account email in the
/// app) and is never interpreted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub display_label: String,
}

impl Session {
    pub fn new(user_id: UserId, display_label: impl Into<String>) -> Self {
        Self {
            user_id,
            display_label: display_label.into(),
        }
    }
}

/// Supplies the current session and a sign-out capability.
///
/// The core reads the session once, at controller construction; tearing
/// down controllers after `sign_out` is the surrounding app's job.
pub trait IdentityProvider: Send + Sync {
    /// The active session, or `None` when signed out.
    fn session(&self) -> Option<Session>;

    /// Ends the session.
    fn sign_out(&self);
}

/// Fixed identity for tests and single-user embedding.
pub struct StaticIdentity {
    session: Mutex<Option<Session>>,
}

impl StaticIdentity {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    fn sign_out(&self) {
        self.session.lock().unwrap().take();
    }
}
