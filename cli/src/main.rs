pub mod auth;
pub mod cli;
pub mod commands;
pub mod logger;
pub mod registry;

use clap::Parser;
use cli::{Cli, Commands};
use logger::Logger;
use registry::{ListFilter, PlayerInput};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let api_url = registry::resolve_api_url(
        cli.api_url.as_deref(),
        std::env::var(registry::API_URL_ENV).ok(),
    )?;
    log::debug!("Using API at {}", api_url);

    match cli.command {
        Commands::Login => commands::login(&api_url).await?,
        Commands::Logout => commands::logout()?,
        Commands::List {
            club,
            min_goals,
            xml,
        } => {
            let client = commands::client_for(&api_url)?;
            commands::list(&client, &ListFilter { club, min_goals }, xml).await?;
        }
        Commands::Create {
            name,
            club,
            position,
            goals,
            assists,
            appearances,
        } => {
            let client = commands::client_for(&api_url)?;
            let player = PlayerInput {
                name: Some(name),
                club: Some(club),
                position: Some(position),
                goals: Some(goals),
                assists: Some(assists),
                appearances: Some(appearances),
            };
            commands::create(&client, &player).await?;
        }
        Commands::Update { id, fields } => {
            let client = commands::client_for(&api_url)?;
            commands::update(&client, id, &PlayerInput::from(fields)).await?;
        }
        Commands::Delete { id } => {
            let client = commands::client_for(&api_url)?;
            commands::delete(&client, id).await?;
        }
        Commands::Demo => commands::demo(&api_url).await?,
    }

    Ok(())
}
