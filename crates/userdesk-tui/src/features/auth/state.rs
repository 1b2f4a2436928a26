use userdesk_core::flows::{LoginFlow, RegisterFlow};
use userdesk_core::session::SharedSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

/// Login form plus an optional notice carried over from registration.
pub struct LoginScreen {
    pub flow: LoginFlow,
    pub focus: LoginField,
    pub notice: Option<String>,
}

impl LoginScreen {
    pub fn new(session: SharedSession, notice: Option<String>) -> Self {
        Self {
            flow: LoginFlow::new(session),
            focus: LoginField::default(),
            notice,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.flow.username,
            LoginField::Password => &mut self.flow.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    #[default]
    Username,
    Email,
    Password,
}

impl RegisterField {
    pub fn next(self) -> Self {
        match self {
            RegisterField::Username => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Username,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            RegisterField::Username => RegisterField::Password,
            RegisterField::Email => RegisterField::Username,
            RegisterField::Password => RegisterField::Email,
        }
    }
}

#[derive(Default)]
pub struct RegisterScreen {
    pub flow: RegisterFlow,
    pub focus: RegisterField,
}

impl RegisterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            RegisterField::Username => &mut self.flow.username,
            RegisterField::Email => &mut self.flow.email,
            RegisterField::Password => &mut self.flow.password,
        }
    }
}
