//! UI event types.
//!
//! All external inputs (terminal, request results) are converted to `UiEvent`
//! before being processed by the reducer.
//!
//! ## Task Lifecycle
//!
//! Requests run on spawned tasks. The reducer marks a task active when it
//! emits the effect; the runtime wraps the result in `TaskCompleted`, and the
//! reducer drops it unless that task is still the active one.

use crossterm::event::Event as CrosstermEvent;
use userdesk_core::api::{ApiResult, LoginResponse};
use userdesk_core::flows::FetchOutcome;

use crate::common::{TaskCompleted, TaskKind};

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (spinner animation).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// Login request finished.
    LoginFinished(ApiResult<LoginResponse>),

    /// Register request finished.
    RegisterFinished(ApiResult<()>),

    /// User list request finished.
    UsersFetched(FetchOutcome),

    /// Create/update/delete request finished.
    UserMutated(ApiResult<()>),

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
