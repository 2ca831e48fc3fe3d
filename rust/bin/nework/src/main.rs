//! `nework`: command-line client for the NeWork social network.
//!
//! Drives the same client core a graphical front end would: the session
//! persists in `~/.nework/nework.redb`, every request carries the API key
//! and the bearer token, and likes/participation go through the feed
//! holders with server confirmation.

mod commands;
mod output;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nework_core::ClientConfig;

use output::Output;

/// NeWork CLI tool.
#[derive(Parser, Debug)]
#[command(name = "nework", about = "NeWork social network client")]
struct Cli {
    /// Path to client config file (default: ~/.nework/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or change client settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Sign in and store the session.
    Login {
        /// Login name.
        #[arg(long)]
        login: Option<String>,
        /// Password (not recommended, use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in with it.
    Register {
        #[arg(long)]
        login: String,
        /// Display name.
        #[arg(long)]
        name: String,
        /// JPEG or PNG avatar.
        #[arg(long)]
        avatar: Option<PathBuf>,
        /// Password (not recommended, use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Posts feed.
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },

    /// Events feed.
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },

    /// Users directory.
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Job history.
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },

    /// Posts of one user plus their profile.
    Wall {
        /// User ID.
        user: i64,
    },

    /// Upload a media file and print its URL.
    Upload {
        file: PathBuf,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Change settings in the config file.
    Set {
        #[arg(long)]
        server: Option<String>,
        #[arg(long = "api-key")]
        api_key: Option<String>,
        /// Request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PostsAction {
    /// List posts.
    List {
        /// Only the N most recent posts.
        #[arg(long)]
        latest: Option<u32>,
        /// Page of N posts older than --before.
        #[arg(long, requires = "count")]
        before: Option<i64>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Show one post with mentioned users.
    Show { id: i64 },
    /// Like or unlike a post.
    Like { id: i64 },
    /// Delete a post.
    Delete {
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    /// Publish a post.
    Create {
        #[arg(long)]
        content: String,
        #[arg(long)]
        link: Option<String>,
        /// Image, video or audio file to attach.
        #[arg(long)]
        attach: Option<PathBuf>,
        /// Mentioned user IDs.
        #[arg(long = "mention", value_delimiter = ',')]
        mentions: Vec<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum EventsAction {
    /// List events.
    List,
    /// Show one event with speakers and participants.
    Show { id: i64 },
    /// Like or unlike an event.
    Like { id: i64 },
    /// Join or leave an event.
    Participate { id: i64 },
    /// Delete an event.
    Delete {
        id: i64,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    /// Publish an event.
    Create {
        #[arg(long)]
        content: String,
        /// Start time, RFC 3339 or `YYYY-MM-DD HH:MM` (UTC).
        #[arg(long)]
        at: String,
        /// Online event (default: offline).
        #[arg(long)]
        online: bool,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        attach: Option<PathBuf>,
        /// Speaker user IDs.
        #[arg(long = "speaker", value_delimiter = ',')]
        speakers: Vec<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum UsersAction {
    /// List all users.
    List,
    /// Show one user.
    Show { id: i64 },
}

#[derive(Subcommand, Debug)]
enum JobsAction {
    /// List jobs (own by default).
    List {
        /// Another user's jobs.
        #[arg(long)]
        user: Option<i64>,
    },
    /// Add a job to your history.
    Add {
        /// Company name.
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: String,
        /// Start date, `YYYY-MM-DD` or RFC 3339.
        #[arg(long)]
        start: String,
        #[arg(long)]
        finish: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// Remove a job from your history.
    Delete {
        id: i64,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(ClientConfig::default_path);
    let out = cli.output;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config_path, out)?,
            ConfigAction::Set {
                server,
                api_key,
                timeout,
                data_dir,
            } => commands::config::set(
                &config_path,
                commands::config::Changes {
                    server,
                    api_key,
                    timeout,
                    data_dir,
                },
            )?,
        },

        Commands::Login { login, password } => {
            let login = match login {
                Some(l) => l,
                None => commands::prompt_line("Login: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            let session = session::Session::open(&config_path, out)?;
            commands::account::login(&session, &login, &password).await?;
        }

        Commands::Register {
            login,
            name,
            avatar,
            password,
        } => {
            let (password, confirm) = match password {
                Some(p) => (p, None),
                None => {
                    let pw = rpassword::prompt_password("Password: ")?;
                    let confirm = rpassword::prompt_password("Confirm password: ")?;
                    (pw, Some(confirm))
                }
            };
            let session = session::Session::open(&config_path, out)?;
            commands::account::register(&session, login, name, password, confirm, avatar.as_deref()).await?;
        }

        Commands::Logout => {
            let session = session::Session::open(&config_path, out)?;
            commands::account::logout(&session);
        }

        Commands::Whoami => {
            let session = session::Session::open(&config_path, out)?;
            commands::account::whoami(&session).await?;
        }

        Commands::Posts { action } => {
            let session = session::Session::open(&config_path, out)?;
            match action {
                PostsAction::List { latest, before, count } => {
                    commands::posts::list(&session, latest, before.zip(count)).await?
                }
                PostsAction::Show { id } => commands::posts::show(&session, id).await?,
                PostsAction::Like { id } => commands::posts::like(&session, id).await?,
                PostsAction::Delete { id, yes } => {
                    if yes || commands::confirm()? {
                        commands::posts::delete(&session, id).await?;
                    }
                }
                PostsAction::Create {
                    content,
                    link,
                    attach,
                    mentions,
                } => commands::posts::create(&session, content, link, attach.as_deref(), mentions).await?,
            }
        }

        Commands::Events { action } => {
            let session = session::Session::open(&config_path, out)?;
            match action {
                EventsAction::List => commands::events::list(&session).await?,
                EventsAction::Show { id } => commands::events::show(&session, id).await?,
                EventsAction::Like { id } => commands::events::like(&session, id).await?,
                EventsAction::Participate { id } => commands::events::participate(&session, id).await?,
                EventsAction::Delete { id, yes } => {
                    if yes || commands::confirm()? {
                        commands::events::delete(&session, id).await?;
                    }
                }
                EventsAction::Create {
                    content,
                    at,
                    online,
                    link,
                    attach,
                    speakers,
                } => {
                    let args = commands::events::NewEvent {
                        content,
                        at,
                        online,
                        link,
                        speakers,
                    };
                    commands::events::create(&session, args, attach.as_deref()).await?
                }
            }
        }

        Commands::Users { action } => {
            let session = session::Session::open(&config_path, out)?;
            match action {
                UsersAction::List => commands::users::list(&session).await?,
                UsersAction::Show { id } => commands::users::show(&session, id).await?,
            }
        }

        Commands::Jobs { action } => {
            let session = session::Session::open(&config_path, out)?;
            match action {
                JobsAction::List { user } => commands::jobs::list(&session, user).await?,
                JobsAction::Add {
                    name,
                    position,
                    start,
                    finish,
                    link,
                } => commands::jobs::add(&session, name, position, &start, finish.as_deref(), link).await?,
                JobsAction::Delete { id, yes } => {
                    if yes || commands::confirm()? {
                        commands::jobs::delete(&session, id).await?;
                    }
                }
            }
        }

        Commands::Wall { user } => {
            let session = session::Session::open(&config_path, out)?;
            commands::users::wall(&session, user).await?;
        }

        Commands::Upload { file } => {
            let session = session::Session::open(&config_path, out)?;
            commands::media::upload(&session, &file).await?;
        }

        Commands::Version => {
            println!("nework cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
