use userdesk_core::api::{User, UserId};
use userdesk_core::flows::{UserDraft, UserListFlow};
use userdesk_core::session::SharedSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Username,
    Email,
    Password,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Username => FormField::Email,
            FormField::Email => FormField::Password,
            FormField::Password => FormField::Username,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Username => FormField::Password,
            FormField::Email => FormField::Username,
            FormField::Password => FormField::Email,
        }
    }
}

/// Create/edit popup.
#[derive(Debug, Clone)]
pub struct UserForm {
    pub mode: FormMode,
    pub draft: UserDraft,
    pub focus: FormField,
    /// Set while this form's own request is in flight.
    pub submitted: bool,
}

impl UserForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: UserDraft::default(),
            focus: FormField::default(),
            submitted: false,
        }
    }

    pub fn edit(user: &User) -> Self {
        Self {
            mode: FormMode::Edit(user.id.clone()),
            draft: UserDraft::from_user(user),
            focus: FormField::default(),
            submitted: false,
        }
    }

    pub fn title(&self) -> String {
        match &self.mode {
            FormMode::Create => "New user".to_string(),
            FormMode::Edit(id) => format!("Edit user {id}"),
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Username => &mut self.draft.username,
            FormField::Email => &mut self.draft.email,
            FormField::Password => &mut self.draft.password,
        }
    }
}

pub struct UsersScreen {
    pub flow: UserListFlow,
    pub selected: usize,
    pub form: Option<UserForm>,
    /// User awaiting delete confirmation.
    pub confirm_delete: Option<User>,
}

impl UsersScreen {
    pub fn new(session: SharedSession) -> Self {
        Self {
            flow: UserListFlow::new(session),
            selected: 0,
            form: None,
            confirm_delete: None,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.flow.users().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.flow.users().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection inside the list after it was replaced.
    pub fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.flow.users().len().saturating_sub(1));
    }
}
