//! User management flow.
//!
//! Holds a read-only copy of the server's user collection. Every successful
//! mutation is followed by a full re-fetch; the cached list is never patched
//! locally. A 401 anywhere clears the session and asks the caller to go to
//! the login screen.

use crate::api::{ApiClient, ApiResult, User, UserId, UserMutation, UserPayload};
use crate::session::SharedSession;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsersStatus {
    #[default]
    Loading,
    Ready,
    Error,
}

/// Classified result of `list_users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(Vec<User>),
    /// Token rejected; the session must be cleared.
    Unauthorized(String),
    Failed(String),
}

impl From<ApiResult<Vec<User>>> for FetchOutcome {
    fn from(result: ApiResult<Vec<User>>) -> Self {
        match result {
            Ok(users) => FetchOutcome::Loaded(users),
            Err(err) if err.is_auth() => FetchOutcome::Unauthorized(err.message),
            Err(err) => FetchOutcome::Failed(err.message),
        }
    }
}

/// What the caller should do with the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    ToLogin,
}

/// Next action requested by the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersStep {
    /// Issue `list_users` with this token, then call `finish_fetch`.
    Fetch { token: String },
    /// Issue the mutation, then call `finish_mutation`.
    Mutate {
        mutation: UserMutation,
        token: String,
    },
    /// No token (or it was rejected): leave for the login screen.
    ToLogin,
    /// Nothing to send; check `error()`.
    Idle,
    /// A request is already in flight.
    Busy,
}

impl UsersStep {
    pub fn navigation(&self) -> Navigation {
        match self {
            UsersStep::ToLogin => Navigation::ToLogin,
            _ => Navigation::Stay,
        }
    }
}

/// Form values for create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserDraft {
    /// Pre-fills a draft from an existing user (password left blank).
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
        }
    }

    fn validate(&self, password_required: bool) -> Result<UserPayload, &'static str> {
        let mut required = vec![self.username.as_str(), self.email.as_str()];
        if password_required {
            required.push(self.password.as_str());
        }
        validation::check_fields(&required, Some(self.email.as_str()))?;

        let password = (!self.password.trim().is_empty()).then(|| self.password.clone());
        Ok(UserPayload {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Fetch,
    Mutation,
}

/// State of the user management screen.
pub struct UserListFlow {
    session: SharedSession,
    users: Vec<User>,
    status: UsersStatus,
    error: Option<String>,
    editing: Option<User>,
    in_flight: Option<InFlight>,
}

impl UserListFlow {
    pub fn new(session: SharedSession) -> Self {
        Self {
            session,
            users: Vec::new(),
            status: UsersStatus::Loading,
            error: None,
            editing: None,
            in_flight: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn status(&self) -> UsersStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The user currently being edited, if edit mode is active.
    pub fn editing(&self) -> Option<&User> {
        self.editing.as_ref()
    }

    /// Enters edit mode for `id`. Returns false if no such user is listed.
    pub fn start_edit(&mut self, id: &UserId) -> bool {
        self.editing = self.users.iter().find(|user| &user.id == id).cloned();
        self.editing.is_some()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Mount: redirect without a token, otherwise start loading.
    pub fn mount(&mut self) -> UsersStep {
        self.begin_fetch()
    }

    /// Starts a full list fetch.
    pub fn begin_fetch(&mut self) -> UsersStep {
        if self.in_flight.is_some() {
            return UsersStep::Busy;
        }
        let Some(token) = self.session.get_token() else {
            return UsersStep::ToLogin;
        };
        self.status = UsersStatus::Loading;
        self.error = None;
        self.in_flight = Some(InFlight::Fetch);
        UsersStep::Fetch { token }
    }

    /// Applies a fetch result.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) -> UsersStep {
        self.in_flight = None;
        match outcome {
            FetchOutcome::Loaded(users) => {
                tracing::debug!(count = users.len(), "user list loaded");
                self.users = users;
                self.status = UsersStatus::Ready;
                self.error = None;
                UsersStep::Idle
            }
            FetchOutcome::Unauthorized(message) => self.reject_session(message),
            FetchOutcome::Failed(message) => {
                self.users.clear();
                self.status = UsersStatus::Error;
                self.error = Some(message);
                UsersStep::Idle
            }
        }
    }

    /// Validates a new user and starts the create request.
    pub fn begin_create(&mut self, draft: &UserDraft) -> UsersStep {
        match draft.validate(true) {
            Ok(payload) => self.begin_mutation(UserMutation::Create(payload)),
            Err(message) => self.reject_draft(message),
        }
    }

    /// Validates changes and starts the update request. A blank password is
    /// left out of the payload.
    pub fn begin_update(&mut self, id: UserId, draft: &UserDraft) -> UsersStep {
        match draft.validate(false) {
            Ok(payload) => self.begin_mutation(UserMutation::Update(id, payload)),
            Err(message) => self.reject_draft(message),
        }
    }

    pub fn begin_delete(&mut self, id: UserId) -> UsersStep {
        self.begin_mutation(UserMutation::Delete(id))
    }

    /// Starts an already-built mutation.
    pub fn begin_mutation(&mut self, mutation: UserMutation) -> UsersStep {
        if self.in_flight.is_some() {
            return UsersStep::Busy;
        }
        let Some(token) = self.session.get_token() else {
            return UsersStep::ToLogin;
        };
        self.error = None;
        self.in_flight = Some(InFlight::Mutation);
        UsersStep::Mutate { mutation, token }
    }

    /// Applies a mutation result. Success always resynchronizes.
    pub fn finish_mutation(&mut self, result: ApiResult<()>) -> UsersStep {
        self.in_flight = None;
        match result {
            Ok(()) => {
                self.editing = None;
                self.begin_fetch()
            }
            Err(err) if err.is_auth() => self.reject_session(err.message),
            Err(err) => {
                self.error = Some(err.message);
                UsersStep::Idle
            }
        }
    }

    /// Runs `step` and every step it leads to until the flow settles.
    ///
    /// Requests are strictly sequential: the resync fetch after a mutation is
    /// only sent once the mutation response has been applied.
    pub async fn drive(&mut self, client: &ApiClient, mut step: UsersStep) -> Navigation {
        loop {
            step = match step {
                UsersStep::Fetch { token } => {
                    let outcome = FetchOutcome::from(client.list_users(&token).await);
                    self.finish_fetch(outcome)
                }
                UsersStep::Mutate { mutation, token } => {
                    tracing::info!(action = mutation.verb(), "mutating user");
                    let result = client.mutate_user(&mutation, &token).await;
                    self.finish_mutation(result)
                }
                settled => return settled.navigation(),
            };
        }
    }

    /// Mounts the flow and loads the list.
    pub async fn load(&mut self, client: &ApiClient) -> Navigation {
        let step = self.mount();
        self.drive(client, step).await
    }

    fn reject_draft(&mut self, message: &str) -> UsersStep {
        self.error = Some(message.to_string());
        UsersStep::Idle
    }

    fn reject_session(&mut self, message: String) -> UsersStep {
        tracing::warn!("session rejected by server, clearing");
        if let Err(err) = self.session.clear_session() {
            tracing::error!("Failed to clear rejected session: {err:#}");
        }
        self.users.clear();
        self.editing = None;
        self.status = UsersStatus::Error;
        self.error = Some(message);
        UsersStep::ToLogin
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::ApiError;
    use crate::session::{MemorySessionStore, SessionStore};

    fn bob() -> User {
        User {
            id: UserId::Number(1),
            username: "bob".to_string(),
            email: "b@x.com".to_string(),
        }
    }

    fn signed_in() -> (UserListFlow, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::with_token("T1", Some("bob")));
        let flow = UserListFlow::new(Arc::clone(&store) as SharedSession);
        (flow, store)
    }

    #[test]
    fn mount_without_token_redirects_without_fetch() {
        let mut flow = UserListFlow::new(MemorySessionStore::new().shared());
        assert_eq!(flow.mount(), UsersStep::ToLogin);
        assert!(!flow.is_busy());
    }

    #[test]
    fn mount_with_token_fetches_with_it() {
        let (mut flow, _) = signed_in();
        assert_eq!(
            flow.mount(),
            UsersStep::Fetch {
                token: "T1".to_string()
            }
        );
        assert_eq!(flow.status(), UsersStatus::Loading);
        assert_eq!(flow.begin_fetch(), UsersStep::Busy);
    }

    #[test]
    fn loaded_list_replaces_cache() {
        let (mut flow, _) = signed_in();
        flow.mount();
        assert_eq!(flow.finish_fetch(FetchOutcome::Loaded(vec![bob()])), UsersStep::Idle);
        assert_eq!(flow.status(), UsersStatus::Ready);
        assert_eq!(flow.users(), &[bob()]);
    }

    #[test]
    fn unauthorized_fetch_clears_session() {
        let (mut flow, store) = signed_in();
        flow.mount();
        let step = flow.finish_fetch(FetchOutcome::Unauthorized("expired".to_string()));
        assert_eq!(step, UsersStep::ToLogin);
        assert_eq!(step.navigation(), Navigation::ToLogin);
        assert_eq!(store.get_token(), None);
    }

    #[test]
    fn failed_fetch_shows_error_with_empty_list() {
        let (mut flow, _) = signed_in();
        flow.mount();
        flow.finish_fetch(FetchOutcome::Loaded(vec![bob()]));

        flow.begin_fetch();
        flow.finish_fetch(FetchOutcome::Failed("down".to_string()));
        assert_eq!(flow.status(), UsersStatus::Error);
        assert_eq!(flow.error(), Some("down"));
        assert!(flow.users().is_empty());
    }

    #[test]
    fn successful_mutation_resyncs_and_clears_edit_mode() {
        let (mut flow, _) = signed_in();
        flow.mount();
        flow.finish_fetch(FetchOutcome::Loaded(vec![bob()]));
        assert!(flow.start_edit(&UserId::Number(1)));

        let draft = UserDraft {
            username: "robert".to_string(),
            email: "r@x.com".to_string(),
            password: String::new(),
        };
        let step = flow.begin_update(UserId::Number(1), &draft);
        let UsersStep::Mutate { mutation, token } = step else {
            panic!("expected mutate step, got {step:?}");
        };
        assert_eq!(token, "T1");
        assert_eq!(
            mutation,
            UserMutation::Update(
                UserId::Number(1),
                UserPayload {
                    username: "robert".to_string(),
                    email: "r@x.com".to_string(),
                    password: None,
                }
            )
        );

        assert_eq!(
            flow.finish_mutation(Ok(())),
            UsersStep::Fetch {
                token: "T1".to_string()
            }
        );
        assert!(flow.editing().is_none());
    }

    #[test]
    fn failed_mutation_keeps_list_and_edit_mode() {
        let (mut flow, _) = signed_in();
        flow.mount();
        flow.finish_fetch(FetchOutcome::Loaded(vec![bob()]));
        flow.start_edit(&UserId::Number(1));

        flow.begin_delete(UserId::Number(1));
        let err = ApiError::from_status(500, "", "Could not delete the user.");
        assert_eq!(flow.finish_mutation(Err(err)), UsersStep::Idle);
        assert_eq!(flow.users(), &[bob()]);
        assert!(flow.editing().is_some());
        assert_eq!(
            flow.error(),
            Some("Server error: 500 - Could not delete the user.")
        );
    }

    #[test]
    fn unauthorized_mutation_clears_session() {
        let (mut flow, store) = signed_in();
        flow.begin_delete(UserId::Number(1));
        let step = flow.finish_mutation(Err(ApiError::from_status(401, "", "x")));
        assert_eq!(step, UsersStep::ToLogin);
        assert_eq!(store.get_token(), None);
    }

    #[test]
    fn resync_after_logout_redirects() {
        let (mut flow, store) = signed_in();
        flow.begin_delete(UserId::Number(1));
        store.clear_session().unwrap();
        assert_eq!(flow.finish_mutation(Ok(())), UsersStep::ToLogin);
    }

    #[test]
    fn invalid_drafts_never_start_a_request() {
        let (mut flow, _) = signed_in();
        let draft = UserDraft {
            username: "amy".to_string(),
            email: "a@x.com".to_string(),
            password: " ".to_string(),
        };
        assert_eq!(flow.begin_create(&draft), UsersStep::Idle);
        assert_eq!(flow.error(), Some(validation::MISSING_FIELDS));
        assert!(!flow.is_busy());

        let draft = UserDraft {
            email: "amy-at-x".to_string(),
            ..draft
        };
        assert_eq!(flow.begin_update(UserId::Number(2), &draft), UsersStep::Idle);
        assert_eq!(flow.error(), Some(validation::INVALID_EMAIL));
    }
}
