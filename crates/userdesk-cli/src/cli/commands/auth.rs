//! Login, register, and logout.

use std::sync::Arc;

use anyhow::{Result, bail};
use userdesk_core::api::ApiClient;
use userdesk_core::flows::{self, AuthOutcome, LoginFlow, RegisterFlow};
use userdesk_core::session::{SessionStore, SharedSession};

use super::prompt::{secret_or_prompt, value_or_prompt};
use crate::interrupt;

pub async fn login(
    client: &ApiClient,
    session: SharedSession,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut flow = LoginFlow::new(Arc::clone(&session));
    flow.username = value_or_prompt(username, "Username").await?;
    flow.password = secret_or_prompt(password, "Password").await?;

    match interrupt::interruptible(flow.submit(client)).await? {
        AuthOutcome::Navigate { .. } => {
            let current = session.load();
            println!(
                "✓ Logged in as {} (token: {})",
                current.username.as_deref().unwrap_or("?"),
                current.masked_token().unwrap_or_default()
            );
            Ok(())
        }
        AuthOutcome::Failed | AuthOutcome::Busy => bail!(
            "Login failed: {}",
            flow.error().unwrap_or("unknown error")
        ),
    }
}

pub async fn register(
    client: &ApiClient,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let mut flow = RegisterFlow::new();
    flow.username = username;
    flow.email = email;
    flow.password = secret_or_prompt(password, "Password").await?;

    match interrupt::interruptible(flow.submit(client)).await? {
        AuthOutcome::Navigate { notice, .. } => {
            println!("✓ {}", notice.unwrap_or_default());
            Ok(())
        }
        AuthOutcome::Failed | AuthOutcome::Busy => bail!(
            "Registration failed: {}",
            flow.error().unwrap_or("unknown error")
        ),
    }
}

pub fn logout(session: &dyn SessionStore) -> Result<()> {
    let was_signed_in = session.get_token().is_some();
    flows::logout(session);
    if was_signed_in {
        println!("✓ Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
