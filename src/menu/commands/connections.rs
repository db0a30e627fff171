//! Command handlers for connection requests and chat messages.
use anyhow::Result;
use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::network::{Connection, ConnectionStatus};

use super::super::context::CommandContext;

pub async fn connect(parts: &[&str], context: &CommandContext) -> Result<()> {
    if parts.len() < 2 {
        context.say("Usage: connect <account_id> [memo...]");
        return Ok(());
    }

    let mut input = json!({ "targetAccountId": parts[1] });
    if parts.len() > 2 {
        input["memo"] = json!(parts[2..].join(" "));
    }

    // The tool normalises the arguments and logs the outcome.
    match context.call_tool("initiate_connection", input).await {
        Ok(output) => {
            let connection: Connection = serde_json::from_str(&output)?;
            context.say(format!(
                "✅ Connection #{} to {} is {}",
                connection.number,
                connection.target_account_id,
                status_label(connection.status)
            ));
        }
        Err(e) => context.say(format!("❌ {}", e)),
    }

    Ok(())
}

pub async fn list(context: &CommandContext) -> Result<()> {
    let connections = context.network().connections().await?;
    if connections.is_empty() {
        context.say("No connections yet. Use 'connect <account_id>'.");
        return Ok(());
    }

    let mut output = format!("Connections ({}):", connections.len());
    for connection in connections {
        output.push_str(&format!(
            "\n  #{} {} ({}) - {}",
            connection.number,
            connection.target_name.as_deref().unwrap_or("Unnamed Agent"),
            connection.target_account_id,
            status_label(connection.status)
        ));
    }
    context.say(output);
    Ok(())
}

pub async fn send(parts: &[&str], context: &CommandContext) -> Result<()> {
    if parts.len() < 3 {
        context.say("Usage: send <n> <message...>");
        return Ok(());
    }

    let Some(number) = parse_connection(parts[1], context) else {
        return Ok(());
    };
    let body = parts[2..].join(" ");

    match context.network().send_message(number, &body).await {
        Ok(id) => {
            context.logger().debug(
                &format!("Message {} sent on connection #{}", id, number),
                Some("Connection"),
            );
            context.say(format!("✅ Message sent on connection #{}", number));
        }
        Err(e) => context.say(format!("❌ {}", e)),
    }
    Ok(())
}

pub async fn messages(parts: &[&str], context: &CommandContext) -> Result<()> {
    if parts.len() != 2 {
        context.say("Usage: messages <n>");
        return Ok(());
    }

    let Some(number) = parse_connection(parts[1], context) else {
        return Ok(());
    };

    let messages = match context.network().fetch_messages(number).await {
        Ok(messages) => messages,
        Err(e) => {
            context.say(format!("❌ {}", e));
            return Ok(());
        }
    };

    if messages.is_empty() {
        context.say(format!("No new messages on connection #{}.", number));
        return Ok(());
    }

    for message in messages {
        let time = Utc
            .timestamp_millis_opt(message.timestamp)
            .single()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        context.say(format!("[{}] {}: {}", time, message.sender, message.content));
    }
    Ok(())
}

fn parse_connection(raw: &str, context: &CommandContext) -> Option<u32> {
    match raw.trim_start_matches('#').parse::<u32>() {
        Ok(number) => Some(number),
        Err(_) => {
            context.say(format!("❌ '{}' is not a connection number", raw));
            None
        }
    }
}

fn status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Pending => "pending",
        ConnectionStatus::Established => "established",
    }
}
