//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use palaver_core::config::Config;
use palaver_tui::Launch;

mod commands;

#[derive(Parser)]
#[command(name = "palaver")]
#[command(version)]
#[command(about = "Terminal client for conversational agent servers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Agent server base URL (overrides config)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Start a new session with this agent
    #[arg(long, value_name = "ID", conflicts_with = "session")]
    agent: Option<String>,

    /// Resume an existing session
    #[arg(long, value_name = "ID")]
    session: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List available agents
    Agents,

    /// Manage sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// List sessions grouped by recency
    List,

    /// Print a session transcript
    Show {
        /// Session id
        session_id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = palaver_core::logging::init();

    let mut config = Config::load().context("load configuration")?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    runtime.block_on(async move {
        match cli.command {
            None => {
                let launch = if let Some(session_id) = cli.session {
                    Launch::Resume(session_id)
                } else if let Some(agent_id) = cli.agent.or_else(|| config.agent_id.clone()) {
                    Launch::NewSession(agent_id)
                } else {
                    Launch::PickAgent
                };
                palaver_tui::run(config, launch).await
            }
            Some(Commands::Agents) => commands::agents::run(&config).await,
            Some(Commands::Sessions { command }) => match command {
                SessionCommands::List => commands::sessions::list(&config).await,
                SessionCommands::Show { session_id } => {
                    commands::sessions::show(&config, &session_id).await
                }
            },
        }
    })
}
