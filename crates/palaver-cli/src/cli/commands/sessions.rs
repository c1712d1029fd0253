//! `palaver sessions` - list sessions and print transcripts.

use anyhow::{Context, Result};
use chrono::Utc;
use palaver_core::chat::{MessageSource, MessageStore};
use palaver_core::config::Config;
use palaver_core::sessions::group_by_recency;

/// Lists sessions grouped into recency buckets, newest bucket first.
pub async fn list(config: &Config) -> Result<()> {
    let client = super::client(config)?;
    let sessions = client.list_sessions().await.context("list sessions")?;

    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    let grouped = group_by_recency(sessions, Utc::now());
    for (label, bucket) in grouped.labeled() {
        if bucket.is_empty() {
            continue;
        }
        println!("{label}");
        for session in bucket {
            println!(
                "  {}  {}  ({})",
                session.id,
                session.display_title(),
                session.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
    }
    Ok(())
}

/// Replays a session's events through the message store and prints the
/// resulting transcript.
pub async fn show(config: &Config, session_id: &str) -> Result<()> {
    let client = super::client(config)?;
    let session = client
        .get_session(session_id)
        .await
        .context("fetch session")?;
    let events = client
        .session_events(session_id)
        .await
        .context("fetch session events")?;

    let mut store = MessageStore::new();
    store.replay(events);

    println!("{} ({})", session.display_title(), session.id);
    println!();

    for message in store.messages() {
        let prefix = match message.source {
            MessageSource::User => "you",
            MessageSource::AiAgent => "agent",
            MessageSource::System => "system",
        };

        if let Some(reasoning) = message.reasoning.as_deref()
            && !reasoning.is_empty()
        {
            for line in reasoning.lines() {
                println!("{prefix} (thinking)> {line}");
            }
        }

        if !message.content.is_empty() {
            let rendered = message.content.rendered();
            for line in rendered.lines() {
                println!("{prefix}> {line}");
            }
        }

        for call in &message.tool_calls {
            match &call.result {
                Some(result) => println!("tool {}> {result}", call.tool_name),
                None => println!("tool {}> (pending)", call.tool_name),
            }
        }
        println!();
    }
    Ok(())
}
