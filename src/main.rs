use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use profile_manager_lib::client::controller::ProfileController;
use profile_manager_lib::client::view::render_profile;
use profile_manager_lib::client::HttpProfileClient;
use profile_manager_lib::config::Config;
use profile_manager_lib::db::Database;
use profile_manager_lib::seed::seed_profile;
use profile_manager_lib::telemetry::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "profile-manager", version, about = "Single-profile manager with skill endorsements")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the profile HTTP API.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Clear the store and insert the sample profile.
    Seed {
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Fetch and print the profile from a running server.
    Show {
        #[arg(long)]
        api: Option<String>,
    },
    /// Endorse one skill on a running server and print the result.
    Endorse {
        skill_id: String,
        #[arg(long)]
        api: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { bind, database } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(database) = database {
                config.server.database_path = database;
            }
            init_tracing(&config.server).map_err(anyhow::Error::msg)?;
            profile_manager_lib::serve(&config.server).await?;
        }
        Command::Seed { database } => {
            if let Some(database) = database {
                config.server.database_path = database;
            }
            init_tracing(&config.server).map_err(anyhow::Error::msg)?;
            let db = Database::new(&config.server.database_path)
                .with_context(|| format!("opening {}", config.server.database_path.display()))?;
            let profile = seed_profile(&db)?;
            println!("Database seeded with profile {} ({} skills)", profile.id, profile.skills.len());
        }
        Command::Show { api } => {
            let mut controller = client_controller(&mut config, api)?;
            if !controller.load().await {
                bail!(controller.error().unwrap_or("Failed to load profile").to_string());
            }
            if let Some(profile) = controller.profile() {
                print!("{}", render_profile(profile));
            }
        }
        Command::Endorse { skill_id, api } => {
            let mut controller = client_controller(&mut config, api)?;
            if !controller.load().await {
                bail!(controller.error().unwrap_or("Failed to load profile").to_string());
            }
            if !controller.endorse(&skill_id).await {
                bail!(controller.error().unwrap_or("Failed to endorse skill").to_string());
            }
            if let Some(skill) = controller.profile().and_then(|profile| profile.skill(&skill_id)) {
                println!("{} now has {} endorsements", skill.name, skill.endorsements);
            }
        }
    }

    Ok(())
}

fn client_controller(config: &mut Config, api: Option<String>) -> anyhow::Result<ProfileController<HttpProfileClient>> {
    if let Some(api) = api {
        config.client.api_url = api;
    }
    init_tracing(&config.server).map_err(anyhow::Error::msg)?;
    let client = HttpProfileClient::new(&config.client)?;
    Ok(ProfileController::new(client))
}
