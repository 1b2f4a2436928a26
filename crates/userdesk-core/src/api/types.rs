//! Wire types for the user-management API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque user identifier.
///
/// Servers send either a JSON number or a string; both are kept verbatim and
/// echoed back in URL paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    /// Parses an id typed by a user (CLI argument, form field).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => UserId::Number(n),
            Err(_) => UserId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UserId::Number(n) => serializer.serialize_i64(*n),
            UserId::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => UserId::Number(n),
            Raw::Text(s) => UserId::Text(s),
        })
    }
}

/// A user as returned by `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// `POST /api/login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /api/login` success body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /api/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Create/update body. `password` is write-only and omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A single write against the user collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMutation {
    Create(UserPayload),
    Update(UserId, UserPayload),
    Delete(UserId),
}

impl UserMutation {
    /// Short verb used in messages and logs.
    pub fn verb(&self) -> &'static str {
        match self {
            UserMutation::Create(_) => "create",
            UserMutation::Update(..) => "update",
            UserMutation::Delete(_) => "delete",
        }
    }
}
