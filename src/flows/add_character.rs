//! Add-character flow: attach another character to the signed-in session.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{AddCharacterStart, ApiClient};
use crate::error::Result;
use crate::poll::{FinalizePoller, FlowHooks, PollPolicy};

use super::{finalize_via_api, SessionState, POLL_INTERVAL};

/// Attempt budget for add-character finalization. Shorter than login: the
/// user is already signed in and can simply retry from the UI.
const ADD_CHARACTER_MAX_ATTEMPTS: u32 = 5;

/// Drives adding a character to an existing session: browser hand-off, then
/// finalize/refresh polling. A successful refresh just means the snapshot
/// was re-fetched; the authenticated flag is left alone.
pub struct AddCharacterFlow {
    api: Arc<ApiClient>,
    session: Arc<SessionState>,
    poller: FinalizePoller,
}

impl AddCharacterFlow {
    /// Flow with the standard add-character budget (5 attempts × 5s).
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionState>) -> Result<Self> {
        Self::with_policy(
            api,
            session,
            PollPolicy {
                max_attempts: ADD_CHARACTER_MAX_ATTEMPTS,
                interval: POLL_INTERVAL,
            },
        )
    }

    /// Same flow with a custom attempt budget and interval.
    pub fn with_policy(
        api: Arc<ApiClient>,
        session: Arc<SessionState>,
        policy: PollPolicy,
    ) -> Result<Self> {
        let hooks = Arc::new(AddCharacterHooks {
            api: Arc::clone(&api),
            session: Arc::clone(&session),
        });
        let poller = FinalizePoller::new(hooks, policy)?;
        Ok(Self {
            api,
            session,
            poller,
        })
    }

    /// Ask the backend to start an add-character authorization and return
    /// the browser hand-off. The state string arrives out of band via the
    /// shell's redirect handler; pass it to [`start_poll`](Self::start_poll).
    pub async fn initiate(&self, account: &str) -> Result<AddCharacterStart> {
        self.api.add_character(account).await
    }

    /// Begin finalization polling for a pending browser authorization.
    ///
    /// Supersedes any poll already running on this flow. Independent of any
    /// poll the login flow may be running.
    pub fn start_poll(&self, state: impl Into<String>) {
        self.poller.start_poll(state);
    }

    pub fn poller(&self) -> &FinalizePoller {
        &self.poller
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }
}

struct AddCharacterHooks {
    api: Arc<ApiClient>,
    session: Arc<SessionState>,
}

#[async_trait]
impl FlowHooks for AddCharacterHooks {
    async fn finalize(&self, state: &str) -> bool {
        finalize_via_api(&self.api, state).await
    }

    async fn refresh(&self) -> bool {
        match self.api.app_data().await {
            Ok(Some(data)) => {
                self.session.store(data);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(%error, "post-add-character app-data refresh failed");
                false
            }
        }
    }
}
