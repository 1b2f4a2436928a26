//! Login and registration flows.
//!
//! `Idle -> Submitting -> {Success | Failed}`; a failure drops back to `Idle`
//! with the message set and the fields untouched.

use crate::api::{ApiClient, ApiResult, LoginRequest, LoginResponse, RegisterRequest};
use crate::nav::Route;
use crate::session::SharedSession;
use crate::validation;

/// Shown after a successful registration.
pub const REGISTERED_NOTICE: &str = "User registered successfully. You can now log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Idle,
    Submitting,
}

/// Result of a `begin`/`finish` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Success: move to `to`, optionally showing `notice` there.
    Navigate {
        to: Route,
        notice: Option<String>,
    },
    /// Validation or request failed; the message is in `error()`.
    Failed,
    /// A request is already in flight; nothing was done.
    Busy,
}

/// Status plus the single active error message.
#[derive(Debug, Clone, Default)]
struct Submission {
    status: AuthStatus,
    error: Option<String>,
}

impl Submission {
    /// Applies the entry guard. Clears the previous error either way.
    fn start(&mut self, check: Result<(), &'static str>) -> Result<(), AuthOutcome> {
        if self.status == AuthStatus::Submitting {
            return Err(AuthOutcome::Busy);
        }
        self.error = None;
        if let Err(message) = check {
            self.error = Some(message.to_string());
            return Err(AuthOutcome::Failed);
        }
        self.status = AuthStatus::Submitting;
        Ok(())
    }

    fn fail(&mut self, message: String) -> AuthOutcome {
        self.status = AuthStatus::Idle;
        self.error = Some(message);
        AuthOutcome::Failed
    }

    fn succeed(&mut self) {
        self.status = AuthStatus::Idle;
        self.error = None;
    }
}

/// Login form state.
pub struct LoginFlow {
    session: SharedSession,
    pub username: String,
    pub password: String,
    submission: Submission,
}

impl LoginFlow {
    pub fn new(session: SharedSession) -> Self {
        Self {
            session,
            username: String::new(),
            password: String::new(),
            submission: Submission::default(),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.submission.status
    }

    pub fn error(&self) -> Option<&str> {
        self.submission.error.as_deref()
    }

    /// Inputs and the submit control are disabled while submitting.
    pub fn inputs_enabled(&self) -> bool {
        self.submission.status == AuthStatus::Idle
    }

    /// Validates the form and marks the request in flight.
    ///
    /// # Errors
    /// `Failed` if a field is blank (no request must be sent), `Busy` if a
    /// request is already in flight.
    pub fn begin(&mut self) -> Result<LoginRequest, AuthOutcome> {
        self.submission.start(validation::check_fields(
            &[self.username.as_str(), self.password.as_str()],
            None,
        ))?;
        Ok(LoginRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Applies the login response: stores the session on success.
    pub fn finish(&mut self, result: ApiResult<LoginResponse>) -> AuthOutcome {
        let response = match result {
            Ok(response) => response,
            Err(err) => return self.submission.fail(err.message),
        };

        let username = self.username.trim();
        if let Err(err) = self.session.set_session(&response.token, Some(username)) {
            return self.submission.fail(format!("Error: could not save session: {err:#}"));
        }

        self.submission.succeed();
        tracing::info!(username, "logged in");
        AuthOutcome::Navigate {
            to: Route::Users,
            notice: None,
        }
    }

    /// Runs a full submission against `client`.
    pub async fn submit(&mut self, client: &ApiClient) -> AuthOutcome {
        let request = match self.begin() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        let result = client.login(&request.username, &request.password).await;
        self.finish(result)
    }
}

/// Registration form state. Never touches the session.
#[derive(Debug, Default)]
pub struct RegisterFlow {
    pub username: String,
    pub password: String,
    pub email: String,
    submission: Submission,
}

impl RegisterFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AuthStatus {
        self.submission.status
    }

    pub fn error(&self) -> Option<&str> {
        self.submission.error.as_deref()
    }

    pub fn inputs_enabled(&self) -> bool {
        self.submission.status == AuthStatus::Idle
    }

    /// Validates the form (including email shape) and marks the request in flight.
    ///
    /// # Errors
    /// `Failed` on a blank field or malformed email, `Busy` if in flight.
    pub fn begin(&mut self) -> Result<RegisterRequest, AuthOutcome> {
        self.submission.start(validation::check_fields(
            &[
                self.username.as_str(),
                self.password.as_str(),
                self.email.as_str(),
            ],
            Some(self.email.as_str()),
        ))?;
        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            email: self.email.trim().to_string(),
        })
    }

    /// Applies the register response. Success leads to the login screen.
    pub fn finish(&mut self, result: ApiResult<()>) -> AuthOutcome {
        if let Err(err) = result {
            return self.submission.fail(err.message);
        }
        self.submission.succeed();
        tracing::info!(username = self.username.trim(), "registered");
        AuthOutcome::Navigate {
            to: Route::Login,
            notice: Some(REGISTERED_NOTICE.to_string()),
        }
    }

    /// Runs a full submission against `client`.
    pub async fn submit(&mut self, client: &ApiClient) -> AuthOutcome {
        let request = match self.begin() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        let result = client
            .register(&request.username, &request.password, &request.email)
            .await;
        self.finish(result)
    }
}
