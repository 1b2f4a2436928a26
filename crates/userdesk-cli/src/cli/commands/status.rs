//! Session status.

use anyhow::Result;
use userdesk_core::api::ApiClient;
use userdesk_core::session::SessionStore;

pub fn show(session: &dyn SessionStore, client: &ApiClient) -> Result<()> {
    let current = session.load();
    println!("API: {}", client.base_url());
    match current.masked_token() {
        Some(token) => println!(
            "Logged in as {} (token: {token})",
            current.username.as_deref().unwrap_or("?")
        ),
        None => println!("Not logged in."),
    }
    Ok(())
}
