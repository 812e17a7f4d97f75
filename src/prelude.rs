//! Convenience re-exports for common use.

pub use crate::api::{AddCharacterStart, ApiClient, LoginStart};
pub use crate::config::ClientConfig;
pub use crate::error::{FlightdeckError, Result};
pub use crate::flows::{AddCharacterFlow, LoginFlow, SessionState};
pub use crate::poll::{FinalizePoller, FlowHooks, PollOutcome, PollPolicy, PollSnapshot};
pub use crate::types::{Account, AccountStatus, AppData, Character};
