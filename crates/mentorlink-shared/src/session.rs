//! Push-based session state.
//!
//! The identity provider reports sign-in and sign-out; views subscribe to
//! those changes for as long as they live. A [`SessionHub`] is an explicit
//! value owned by whoever embeds it, not a process-wide singleton.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::types::{ProviderKind, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub display_name: String,
    pub provider: ProviderKind,
}

/// Publisher side of the session channel.
#[derive(Debug)]
pub struct SessionHub {
    tx: watch::Sender<Option<Session>>,
}

impl SessionHub {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn sign_in(&self, session: Session) {
        info!(user = %session.user_id, provider = ?session.provider, "Session started");
        self.tx.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.tx.send_replace(None) {
            info!(user = %previous.user_id, "Session ended");
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Start observing. Dropping the returned handle unsubscribes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber side, tied to the lifetime of the consuming view.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    /// The latest known session, whether or not it was already observed.
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Wait for the next sign-in/sign-out.
    ///
    /// Returns `None` once the hub is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
