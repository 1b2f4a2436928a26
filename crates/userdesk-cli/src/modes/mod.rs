//! Runtime execution modes.
//!
//! - subcommands: one-shot, print to stdout/stderr
//! - `tui`: full-screen interactive terminal UI (optional feature)

#[cfg(feature = "tui")]
pub use userdesk_tui::run as run_tui;

#[cfg(not(feature = "tui"))]
pub fn run_tui(
    _config: &userdesk_core::config::Config,
    _session: userdesk_core::session::SharedSession,
) -> anyhow::Result<()> {
    anyhow::bail!(
        "TUI support is disabled in this build (feature \"tui\").\n\
         Use `userdesk --help` to see the available commands."
    );
}
