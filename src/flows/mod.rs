//! Login and add-character flows built on the polling engine.
//!
//! Each flow pairs an [`ApiClient`](crate::api::ApiClient) with a
//! [`FinalizePoller`](crate::poll::FinalizePoller): `initiate` asks the
//! backend for a browser redirect, the shell opens it externally, and once
//! the redirect hands the state string back, `start_poll` drives
//! finalization. The two flows differ only in attempt budget and in what a
//! successful refresh means.

mod add_character;
mod login;

pub use add_character::AddCharacterFlow;
pub use login::LoginFlow;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::api::ApiClient;
use crate::types::AppData;

/// Fixed tick interval both flows poll at.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shared view of the signed-in session: an authenticated flag plus the
/// last fetched application snapshot.
///
/// One instance is shared between flows and whatever presents the data;
/// all methods are `&self`.
#[derive(Debug, Default)]
pub struct SessionState {
    authenticated: AtomicBool,
    data: Mutex<Option<AppData>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the login flow has confirmed an authenticated session.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// The last stored application snapshot, if any.
    pub fn data(&self) -> Option<AppData> {
        self.lock_data().clone()
    }

    /// Drop the snapshot and authenticated flag (logout).
    pub fn clear(&self) {
        self.set_authenticated(false);
        *self.lock_data() = None;
    }

    pub(crate) fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::SeqCst);
    }

    pub(crate) fn store(&self, data: AppData) {
        *self.lock_data() = Some(data);
    }

    fn lock_data(&self) -> MutexGuard<'_, Option<AppData>> {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shared finalize hook body: both flows hit the same backend endpoint and
/// map any transport error to "not ready".
pub(crate) async fn finalize_via_api(api: &ApiClient, state: &str) -> bool {
    match api.finalize_login(state).await {
        Ok(success) => success,
        Err(error) => {
            tracing::warn!(%error, "finalize-login call failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_starts_unauthenticated_and_empty() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());
        assert!(session.data().is_none());
    }

    #[test]
    fn clear_resets_flag_and_snapshot() {
        let session = SessionState::new();
        session.set_authenticated(true);
        session.store(AppData::default());

        session.clear();

        assert!(!session.is_authenticated());
        assert!(session.data().is_none());
    }
}
