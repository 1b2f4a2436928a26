//! Login and registration screens.

mod render;
mod state;
mod update;

pub use render::{render_login, render_register};
pub use state::{LoginField, LoginScreen, RegisterField, RegisterScreen};
pub use update::{
    handle_login_key, handle_login_paste, handle_login_result, handle_register_key,
    handle_register_paste, handle_register_result,
};
