//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use userdesk_core::api::ApiClient;
use userdesk_core::config::Config;
use userdesk_core::logging;
use userdesk_core::session::{FileSessionStore, MemorySessionStore, SharedSession};

use crate::{interrupt, modes};

mod commands;

#[derive(Parser)]
#[command(name = "userdesk")]
#[command(version)]
#[command(about = "Terminal client for the userdesk user-management API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the API (overrides config and USERDESK_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Keep the session in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Register a new account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show who is logged in
    Status,
    /// Manage users (requires login)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Create a user
    Create {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Update a user (password is kept unless given)
    Update {
        /// The ID of the user to update
        #[arg(value_name = "USER_ID")]
        id: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Delete a user
    Delete {
        /// The ID of the user to delete
        #[arg(value_name = "USER_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let result = rt.block_on(async move { dispatch(cli).await });
    // An interrupted prompt leaves its stdin reader blocked; don't wait for it.
    rt.shutdown_background();
    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        api_url,
        ephemeral,
    } = cli;

    // Config commands must work even when the config file is broken.
    if let Some(Commands::Config { command }) = &command {
        return match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let config = Config::load()
        .context("load config")?
        .with_api_url(api_url.as_deref());
    let session: SharedSession = if ephemeral {
        MemorySessionStore::new().shared()
    } else {
        FileSessionStore::open_default()?.shared()
    };

    // default to the interactive UI
    let Some(command) = command else {
        return modes::run_tui(&config, session);
    };

    interrupt::init()?;
    let client = ApiClient::new(&config)?;
    tracing::debug!(api_url = client.base_url(), "running subcommand");

    match command {
        Commands::Login { username, password } => {
            commands::auth::login(&client, session, username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&client, username, email, password).await,
        Commands::Logout => commands::auth::logout(session.as_ref()),
        Commands::Status => commands::status::show(session.as_ref(), &client),

        Commands::Users { command } => match command {
            UserCommands::List => commands::users::list(&client, session).await,
            UserCommands::Create {
                username,
                email,
                password,
            } => commands::users::create(&client, session, username, email, password).await,
            UserCommands::Update {
                id,
                username,
                email,
                password,
            } => commands::users::update(&client, session, &id, username, email, password).await,
            UserCommands::Delete { id } => commands::users::delete(&client, session, &id).await,
        },

        Commands::Config { .. } => unreachable!("config commands return before config load"),
    }
}
