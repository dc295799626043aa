//! skirmish - command-line driver for the rules engine

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skirmish::combat::RandomDice;
use skirmish::demo::run_demo;
use skirmish::{Command, Config, GameSession, SessionHandle};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tabletop skirmish rules engine
#[derive(Parser, Debug)]
#[command(name = "skirmish", version, about = "Turn-based tabletop skirmish rules engine")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Play a scripted game between the two built-in armies
    Demo {
        /// Dice seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,
        /// Battle rounds to play
        #[arg(long, default_value_t = 3)]
        rounds: u32,
    },
    /// Execute a JSON list of commands against a fresh session
    Run { script: PathBuf },
    /// Print the command ability catalog
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "skirmish=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(args.json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!args.json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let config = Config::load(args.config.as_deref())?;

    match args.cmd {
        Cmd::Demo { seed, rounds } => {
            let mut session = GameSession::new(config);
            if let Some(seed) = seed {
                session = session.with_dice(RandomDice::seeded(seed));
            }
            let summary = run_demo(session, rounds)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Cmd::Run { script } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let commands: Vec<Command> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", script.display()))?;

            let handle = SessionHandle::new(GameSession::new(config));
            info!("Running {} commands", commands.len());
            for command in commands {
                let reply = handle.execute(command).await;
                println!("{}", serde_json::to_string(&reply)?);
            }
        }
        Cmd::Catalog => {
            let session = GameSession::new(config);
            println!("{}", serde_json::to_string_pretty(session.command_catalog())?);
        }
    }

    Ok(())
}
