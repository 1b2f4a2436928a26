//! Line prompts on stdin.
//!
//! Reads run on the blocking pool so Ctrl+C can end a prompt. Secrets typed
//! at a terminal are read in raw mode and never echoed; piped stdin is read
//! line by line either way.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::interrupt::{self, InterruptedError};

/// Returns `value` or asks for it on stdin.
///
/// # Errors
/// Returns an error if stdin is closed or unreadable, or `InterruptedError`
/// on Ctrl+C.
pub async fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt(label, false).await,
    }
}

/// Like [`value_or_prompt`], without echoing what is typed.
///
/// # Errors
/// See [`value_or_prompt`].
pub async fn secret_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt(label, true).await,
    }
}

async fn prompt(label: &str, secret: bool) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let line = if secret && io::stdin().is_terminal() {
        // Raw mode turns Ctrl+C into a key press, handled by the reader.
        let read = tokio::task::spawn_blocking(read_hidden_line)
            .await
            .context("join password reader")?;
        println!();
        read?
    } else {
        interrupt::interruptible(tokio::task::spawn_blocking(read_plain_line))
            .await?
            .context("join stdin reader")?
            .with_context(|| format!("read {label} from stdin"))?
    };

    line.ok_or_else(|| anyhow::anyhow!("No input for {label}"))
}

fn read_plain_line() -> io::Result<Option<String>> {
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

/// Reads keys until Enter. `None` on Ctrl+D at an empty prompt.
fn read_hidden_line() -> Result<Option<String>> {
    let _raw = RawMode::enable()?;
    let mut input = String::new();

    loop {
        let Event::Key(key) = event::read().context("read key")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return Ok(Some(input)),
            KeyCode::Char('c') if ctrl => return Err(InterruptedError.into()),
            KeyCode::Char('d') if ctrl && input.is_empty() => return Ok(None),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) if !ctrl => input.push(ch),
            _ => {}
        }
    }
}

struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
