//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).

use userdesk_core::api::{LoginRequest, RegisterRequest, UserMutation};

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// `POST /api/login`.
    Login { task: TaskId, request: LoginRequest },

    /// `POST /api/register`.
    Register {
        task: TaskId,
        request: RegisterRequest,
    },

    /// `GET /api/users`.
    FetchUsers { task: TaskId, token: String },

    /// Create, update, or delete a user.
    MutateUser {
        task: TaskId,
        mutation: UserMutation,
        token: String,
    },
}
