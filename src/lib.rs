//! Flightdeck — async client for the companion backend.
//!
//! The desktop shell signs users in through an external browser: the backend
//! hands out a redirect URL plus an opaque state string, the user approves in
//! the browser, and the client then converges on the result by polling —
//! first finalizing the pending authorization, then re-fetching the
//! application snapshot until it reflects the new session. The polling
//! engine lives in [`poll`]; [`flows`] wires it to the backend for the login
//! and add-character cases.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use flightdeck::prelude::*;
//!
//! # async fn example() -> flightdeck::error::Result<()> {
//! let api = Arc::new(ApiClient::new(&ClientConfig::from_env())?);
//! let session = Arc::new(SessionState::new());
//! let login = LoginFlow::new(Arc::clone(&api), Arc::clone(&session))?;
//!
//! let start = login.initiate("main-account").await?;
//! // Open `start.redirect_url` in the system browser; once the redirect
//! // hands the state string back, begin polling:
//! login.start_poll(start.state);
//!
//! let mut watcher = login.poller().watch();
//! watcher.wait_for(|snapshot| !snapshot.active).await.ok();
//! if session.is_authenticated() {
//!     println!("signed in");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod flows;
pub mod poll;
pub mod prelude;
pub mod types;
