//! Initial sign-in flow.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiClient, LoginStart};
use crate::error::Result;
use crate::poll::{FinalizePoller, FlowHooks, PollPolicy};

use super::{finalize_via_api, SessionState, POLL_INTERVAL};

/// Attempt budget for login finalization (a bit over two minutes at the
/// 5-second interval).
const LOGIN_MAX_ATTEMPTS: u32 = 25;

/// Drives the initial sign-in: ask the backend for a browser redirect, then
/// poll finalize/refresh until the session is authenticated.
///
/// A successful refresh here means the uncached snapshot reports a live
/// backend session; only then is [`SessionState::is_authenticated`] flipped.
pub struct LoginFlow {
    api: Arc<ApiClient>,
    session: Arc<SessionState>,
    poller: FinalizePoller,
}

impl LoginFlow {
    /// Flow with the standard login budget (25 attempts × 5s).
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionState>) -> Result<Self> {
        Self::with_policy(
            api,
            session,
            PollPolicy {
                max_attempts: LOGIN_MAX_ATTEMPTS,
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
        let hooks = Arc::new(LoginHooks {
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

    /// Ask the backend to start a login and return the browser hand-off.
    ///
    /// The caller opens [`LoginStart::redirect_url`] externally, then calls
    /// [`start_poll`](Self::start_poll) with the state string once the
    /// redirect comes back through the shell.
    pub async fn initiate(&self, account: &str) -> Result<LoginStart> {
        self.session.set_authenticated(false);
        self.api.login(account).await
    }

    /// Begin finalization polling for a pending browser authorization.
    ///
    /// Supersedes any poll already running on this flow.
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

struct LoginHooks {
    api: Arc<ApiClient>,
    session: Arc<SessionState>,
}

#[async_trait]
impl FlowHooks for LoginHooks {
    async fn finalize(&self, state: &str) -> bool {
        finalize_via_api(&self.api, state).await
    }

    async fn refresh(&self) -> bool {
        match self.api.app_data_no_cache().await {
            Ok(Some(data)) if data.logged_in => {
                self.session.store(data);
                self.session.set_authenticated(true);
                true
            }
            Ok(_) => false,
            Err(error) => {
                tracing::warn!(%error, "post-login app-data refresh failed");
                false
            }
        }
    }
}
