//! HTTP client for the user-management API.
//!
//! One request per call, no retries. Every failure is normalized into an
//! `ApiError` (see `error.rs`).

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, ApiResult};
use super::types::{
    LoginRequest, LoginResponse, RegisterRequest, User, UserId, UserMutation, UserPayload,
};
use crate::config::Config;
use crate::validation;

const LOGIN_PATH: &[&str] = &["api", "login"];
const REGISTER_PATH: &[&str] = &["api", "register"];
const USERS_PATH: &[&str] = &["api", "users"];

const LOGIN_FALLBACK: &str = "Could not log in. Check your credentials.";
const REGISTER_FALLBACK: &str = "Could not register the user.";
const LIST_FALLBACK: &str = "Could not fetch the user list.";
const CREATE_FALLBACK: &str = "Could not create the user.";
const UPDATE_FALLBACK: &str = "Could not update the user.";
const DELETE_FALLBACK: &str = "Could not delete the user.";

/// Client for the four logical endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    base: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Builds a client from config.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.api_url.trim().trim_end_matches('/').to_string();
        let base =
            Url::parse(&base_url).with_context(|| format!("Invalid API URL '{base_url}'"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Invalid API URL '{base_url}': not a hierarchical URL");
        }

        let timeout = config.request_timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            base,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/login`.
    ///
    /// # Errors
    /// `Auth` on rejected credentials, otherwise `Server`/`Network`/`Timeout`/`Request`.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self.request(Method::POST, LOGIN_PATH).json(&body);
        let response = self.send(request, LOGIN_FALLBACK).await?;
        self.decode(response).await
    }

    /// `POST /api/register`.
    ///
    /// The email shape is checked first; a mismatch fails with `Validation`
    /// without touching the network.
    ///
    /// # Errors
    /// `Validation` on a malformed email, otherwise the usual taxonomy.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> ApiResult<()> {
        if !validation::is_valid_email(email) {
            return Err(ApiError::validation(validation::INVALID_EMAIL));
        }

        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };
        let request = self.request(Method::POST, REGISTER_PATH).json(&body);
        self.send(request, REGISTER_FALLBACK).await?;
        Ok(())
    }

    /// `GET /api/users` with the bearer token.
    ///
    /// # Errors
    /// `Auth` (401) means the token was rejected; callers must clear the session.
    pub async fn list_users(&self, token: &str) -> ApiResult<Vec<User>> {
        let request = self.request(Method::GET, USERS_PATH).bearer_auth(token);
        let response = self.send(request, LIST_FALLBACK).await?;
        self.decode(response).await
    }

    /// Creates, updates, or deletes a user.
    ///
    /// # Errors
    /// Same taxonomy as `list_users`.
    pub async fn mutate_user(&self, mutation: &UserMutation, token: &str) -> ApiResult<()> {
        let (request, fallback) = match mutation {
            UserMutation::Create(payload) => (
                self.request(Method::POST, USERS_PATH).json(payload),
                CREATE_FALLBACK,
            ),
            UserMutation::Update(id, payload) => (
                self.user_request(Method::PUT, id, Some(payload)),
                UPDATE_FALLBACK,
            ),
            UserMutation::Delete(id) => (
                self.user_request(Method::DELETE, id, None),
                DELETE_FALLBACK,
            ),
        };
        self.send(request.bearer_auth(token), fallback).await?;
        Ok(())
    }

    /// Appends `segments` to the base URL, percent-encoding each one as a
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!(%method, path = url.path(), "api request");
        self.http.request(method, url)
    }

    fn user_request(
        &self,
        method: Method,
        id: &UserId,
        payload: Option<&UserPayload>,
    ) -> RequestBuilder {
        let id = id.to_string();
        let request = self.request(method, &[USERS_PATH[0], USERS_PATH[1], id.as_str()]);
        match payload {
            Some(payload) => request.json(payload),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            let err = ApiError::from_reqwest(&e, self.timeout);
            tracing::warn!(kind = %err.kind, "request failed: {e}");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body, fallback);
        tracing::warn!(status = status.as_u16(), kind = %err.kind, "server rejected request");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::from_reqwest(&e, self.timeout))
    }
}
