use anyhow::Context;
use clap::Parser;
use notedeck_config::{Config, MarkSet};
use notedeck_core::markdown::FileKind;
use notedeck_core::{MarkingTag, StudyMark, VocabMark};
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod browse;
pub mod cli;
pub mod events;
pub mod io;
pub mod render;
pub mod session;
pub mod state;


use self::browse::ShowOptions;
use self::cli::{Cli, Command};
use self::session::TableSession;
use self::state::AppState;

fn init_tracing(default_filter: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { default_filter };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::new();
    init_tracing(&config.log_filter, cli.verbose);

    let state = AppState::new(config).context("Failed to build API client")?;
    run(&state, cli.command).await
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let response = state.client.login(&username, &password).await?;
            if response.expires_in.is_empty() {
                println!("Logged in");
            } else {
                println!("Logged in (token expires in {})", response.expires_in);
            }
        }
        Command::Logout => {
            state.client.logout()?;
            println!("Logged out");
        }
        Command::Verify => {
            if state.client.verify_token().await {
                println!("Token is valid");
            } else {
                anyhow::bail!("Not logged in or token expired, run `notedeck login`");
            }
        }
        Command::Groups { search } => {
            let summaries = browse::list_groups(&state.client, search.as_deref()).await?;
            if summaries.is_empty() {
                println!("No groups found");
            } else {
                println!("{}", render::render_groups(&summaries));
            }
        }
        Command::Tree { group } => browse::show_tree(state, &group).await?,
        Command::Show {
            group,
            path,
            search,
            filter,
            page,
            per_page,
            raw,
        } => {
            let options = ShowOptions {
                search,
                filter,
                page,
                per_page,
                raw,
            };
            browse::show_file(state, &group, &path, options).await?
        }
        Command::Open { group, path } => match state.config.table.mark_set {
            MarkSet::Study => open_table::<StudyMark>(state, &group, &path).await?,
            MarkSet::Vocab => open_table::<VocabMark>(state, &group, &path).await?,
        },
    }

    Ok(())
}

async fn open_table<M: MarkingTag>(state: &AppState, slug: &str, path: &str) -> anyhow::Result<()> {
    let (group, file) = browse::fetch_file(state, slug, path).await?;
    if FileKind::of(&file.name) != FileKind::Csv {
        anyhow::bail!("{path} is not a CSV file, use `notedeck show`");
    }

    let Some(controller) = browse::open_controller::<M>(state, &group, &file).await else {
        return Ok(());
    };

    println!("Type `help` for commands.");
    let session = TableSession::new();

    tokio::select! {
        result = session.run(controller) => result,
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            session.shutdown();
            // A pending stdin read would otherwise hold the runtime open
            std::process::exit(130);
        }
    }
}
