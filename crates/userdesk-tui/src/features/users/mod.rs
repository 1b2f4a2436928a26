//! User management screen.

mod render;
mod state;
mod update;

pub use render::render_users;
pub use state::{FormField, FormMode, UserForm, UsersScreen};
pub use update::{handle_fetched, handle_key, handle_mutated, handle_paste, mount};
