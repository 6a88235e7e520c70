//! `lppm` - command-line front end for the LPPM API

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use lppm_client::api::Resource;
use lppm_client::logger::init_logger;
use lppm_client::routes::menu_for;
use lppm_client::storage::FileStorage;
use lppm_client::store::{RemoteCollection, Stores};
use lppm_client::{ApiClient, ClientConfig, LoginRequest};
use shared::models::{CommunityService, ProgramStudi, ProposalStatus, ResearchProposal};

#[derive(Parser)]
#[command(name = "lppm")]
#[command(about = "LPPM research and community-service client")]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "LPPM_API_URL")]
    api_url: Option<String>,
    /// Session storage file
    #[arg(long, global = true, env = "LPPM_STORAGE_PATH")]
    storage: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Verify the stored session with the server
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Research proposals
    Research {
        #[command(subcommand)]
        command: ListCommand,
    },
    /// Community-service proposals
    Service {
        #[command(subcommand)]
        command: ListCommand,
    },
    /// Study programs
    Programs {
        #[command(subcommand)]
        command: ListCommand,
    },
    /// Screens available to the signed-in role
    Routes,
}

#[derive(Subcommand)]
enum ListCommand {
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    status: Option<ProposalStatus>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }

    if let Err(e) = init_logger(&config.log_level, config.log_json) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: ClientConfig) -> anyhow::Result<()> {
    let api = ApiClient::from_config(&config)?;
    let storage = Arc::new(FileStorage::open(&config.storage_path));
    let stores = Stores::new(api, storage, config.page_size).await;
    let _listener = stores.session.spawn_auth_listener();

    match command {
        Command::Login { email, password } => {
            let user = stores
                .session
                .login(LoginRequest::new(email, password))
                .await?;
            println!("Signed in as {} ({})", user.name, user.role.label());
        }
        Command::Logout => {
            stores.session.logout().await;
            println!("Signed out");
        }
        Command::Whoami => {
            if !stores.session.check_auth().await {
                anyhow::bail!("Not signed in");
            }
            if let Some(user) = stores.session.user().await {
                println!("{} <{}>", user.name, user.email);
                println!("role: {}", user.role.label());
            }
        }
        Command::Refresh => {
            stores.session.refresh_token().await?;
            println!("Token refreshed");
        }
        Command::Research {
            command: ListCommand::List(args),
        } => {
            list(&stores.research, args, |r: &ResearchProposal| {
                format!("{:<8} {:<13} {} ({})", r.id, r.status.label(), r.title, r.year)
            })
            .await?;
        }
        Command::Service {
            command: ListCommand::List(args),
        } => {
            list(&stores.services, args, |s: &CommunityService| {
                format!("{:<8} {:<13} {} - {}", s.id, s.status.label(), s.title, s.partner_name)
            })
            .await?;
        }
        Command::Programs {
            command: ListCommand::List(args),
        } => {
            list(&stores.programs, args, |p: &ProgramStudi| {
                format!("{:<8} {:<8} {} / {}", p.id, p.code, p.display_name(), p.faculty)
            })
            .await?;
        }
        Command::Routes => {
            if !stores.session.check_auth().await {
                anyhow::bail!("Not signed in");
            }
            let Some(user) = stores.session.user().await else {
                anyhow::bail!("Session has no user");
            };
            for entry in menu_for(user.role) {
                println!("{:<20} {}", entry.label, entry.route);
            }
        }
    }

    Ok(())
}

async fn list<R: Resource>(
    store: &RemoteCollection<R>,
    args: ListArgs,
    render: impl Fn(&R) -> String,
) -> anyhow::Result<()> {
    let current = store.query().await;
    let mut query = current.clone().paginate(args.page, args.limit.unwrap_or(current.limit));
    if let Some(status) = args.status {
        query = query.filter("status", status.as_str());
    }
    if let Some(search) = args.search.filter(|s| !s.trim().is_empty()) {
        query = query.search(search);
    }
    store.set_query(query).await?;

    let state = store.snapshot().await;
    for item in &state.items {
        println!("{}", render(item));
    }
    let p = state.pagination;
    println!(
        "-- {} {} of {}, page {}/{}",
        state.items.len(),
        R::LABEL.to_lowercase(),
        p.total,
        p.page,
        p.total_pages.max(1)
    );
    Ok(())
}
