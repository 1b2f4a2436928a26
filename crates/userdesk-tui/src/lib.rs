//! Full-screen TUI for userdesk.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
pub use features::{auth, users};
pub use runtime::TuiRuntime;
use userdesk_core::api::ApiClient;
use userdesk_core::config::Config;
use userdesk_core::session::SharedSession;

/// Runs the interactive UI until the user quits.
///
/// Must be called from within a tokio runtime; requests run on spawned tasks.
///
/// # Errors
/// Returns an error if stdout is not a terminal, the API client cannot be
/// built, or the terminal fails.
pub fn run(config: &Config, session: SharedSession) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The interactive UI requires a terminal.\n\
             Use `userdesk users list` and friends for non-interactive use."
        );
    }

    let client = ApiClient::new(config)?;
    tracing::info!(api_url = client.base_url(), "starting tui");

    let mut runtime = TuiRuntime::new(client, session)?;
    runtime.run()
}
