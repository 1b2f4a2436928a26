//! User-management API: client, wire types, and error taxonomy.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiErrorKind, ApiResult, NO_RESPONSE_MESSAGE};
pub use types::{
    LoginRequest, LoginResponse, RegisterRequest, User, UserId, UserMutation, UserPayload,
};
