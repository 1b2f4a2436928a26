//! User management commands.
//!
//! Every mutation is followed by a fresh list fetch, and the printed table
//! is always that server copy.

use anyhow::{Result, bail};
use unicode_width::UnicodeWidthStr;
use userdesk_core::api::{ApiClient, User, UserId};
use userdesk_core::flows::{Navigation, UserDraft, UserListFlow, UsersStep};
use userdesk_core::session::SharedSession;

use super::prompt::secret_or_prompt;
use crate::interrupt;

pub async fn list(client: &ApiClient, session: SharedSession) -> Result<()> {
    let mut flow = UserListFlow::new(session);
    let navigation = interrupt::interruptible(flow.load(client)).await?;
    settle(&flow, navigation)?;
    print_users(flow.users());
    Ok(())
}

pub async fn create(
    client: &ApiClient,
    session: SharedSession,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let draft = UserDraft {
        username,
        email,
        password: secret_or_prompt(password, "Password").await?,
    };
    let mut flow = UserListFlow::new(session);
    let step = flow.begin_create(&draft);
    mutate(client, &mut flow, step, "Created").await
}

pub async fn update(
    client: &ApiClient,
    session: SharedSession,
    id: &str,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let draft = UserDraft {
        username,
        email,
        password: password.unwrap_or_default(),
    };
    let mut flow = UserListFlow::new(session);
    let step = flow.begin_update(UserId::parse(id), &draft);
    mutate(client, &mut flow, step, "Updated").await
}

pub async fn delete(client: &ApiClient, session: SharedSession, id: &str) -> Result<()> {
    let mut flow = UserListFlow::new(session);
    let step = flow.begin_delete(UserId::parse(id));
    mutate(client, &mut flow, step, "Deleted").await
}

async fn mutate(
    client: &ApiClient,
    flow: &mut UserListFlow,
    step: UsersStep,
    done: &str,
) -> Result<()> {
    let navigation = interrupt::interruptible(flow.drive(client, step)).await?;
    settle(flow, navigation)?;
    println!("✓ {done} user.");
    print_users(flow.users());
    Ok(())
}

/// Turns a settled flow into a command result.
fn settle(flow: &UserListFlow, navigation: Navigation) -> Result<()> {
    match (navigation, flow.error()) {
        (Navigation::ToLogin, Some(error)) => {
            bail!("{error}\nSession is no longer valid; run `userdesk login`.")
        }
        (Navigation::ToLogin, None) => bail!("Not logged in. Run `userdesk login` first."),
        (Navigation::Stay, Some(error)) => bail!("{error}"),
        (Navigation::Stay, None) => Ok(()),
    }
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let ids: Vec<String> = users.iter().map(|u| u.id.to_string()).collect();
    let id_width = column_width("ID", ids.iter().map(String::as_str));
    let name_width = column_width("USERNAME", users.iter().map(|u| u.username.as_str()));

    println!("{}  {}  EMAIL", pad("ID", id_width), pad("USERNAME", name_width));
    for (user, id) in users.iter().zip(&ids) {
        println!(
            "{}  {}  {}",
            pad(id, id_width),
            pad(&user.username, name_width),
            user.email
        );
    }
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(UnicodeWidthStr::width).fold(header.width(), usize::max)
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}
