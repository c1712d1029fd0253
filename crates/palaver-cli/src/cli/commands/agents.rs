//! `palaver agents` - list the agent catalog.

use anyhow::{Context, Result};
use palaver_core::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    let client = super::client(config)?;
    let agents = client.list_agents().await.context("list agents")?;

    if agents.is_empty() {
        println!("No agents available.");
        return Ok(());
    }

    let id_width = agents
        .iter()
        .map(|agent| agent.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    println!("{:<id_width$}  NAME", "ID");
    for agent in agents {
        println!("{:<id_width$}  {}", agent.id, agent.name);
    }
    Ok(())
}
