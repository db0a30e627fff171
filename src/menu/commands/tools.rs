use anyhow::Result;
use serde_json::json;

use super::super::context::CommandContext;

pub async fn weather(parts: &[&str], context: &CommandContext) -> Result<()> {
    if !(2..=3).contains(&parts.len()) {
        context.say("Usage: weather <city> [country]");
        return Ok(());
    }

    let mut input = json!({ "city": parts[1] });
    if let Some(country) = parts.get(2) {
        input["country"] = json!(country);
    }

    match context.call_tool("get_weather", input).await {
        Ok(report) => context.say(report),
        Err(e) => context.say(format!("❌ {}", e)),
    }
    Ok(())
}

pub fn list(context: &CommandContext) {
    let tools = context.tools().descriptions();
    if tools.is_empty() {
        context.say("No tools registered.");
        return;
    }

    let mut output = format!("Tools ({}):", tools.len());
    for (name, description) in tools {
        output.push_str(&format!("\n  {} - {}", name, description));
    }
    context.say(output);
}

#[cfg(test)]
mod tests {
    use super::super::{dispatch, tests::context};

    #[tokio::test]
    async fn weather_prints_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let (context, sink) = context(dir.path());

        dispatch(&["weather", "Lima", "Peru"], &context).await.unwrap();
        let text = sink.texts().join("\n");
        assert!(text.contains("\"location\": \"Lima, Peru\""));
        assert!(text.contains("\"condition\": \"Rainy\""));
    }

    #[tokio::test]
    async fn tool_notices_follow_the_relay() {
        let dir = tempfile::TempDir::new().unwrap();
        let (context, sink) = context(dir.path());

        dispatch(&["weather", "Oslo"], &context).await.unwrap();
        assert!(!sink.texts().iter().any(|t| t.starts_with("Running get_weather")));

        context.relay().uninstall();
        sink.clear();
        dispatch(&["weather", "Oslo"], &context).await.unwrap();
        let texts = sink.texts();
        assert_eq!(texts[0], r#"Running get_weather with args {"city":"Oslo"}"#);
        assert!(texts[1].starts_with("Got output {"));
    }

    #[tokio::test]
    async fn tools_lists_registered() {
        let dir = tempfile::TempDir::new().unwrap();
        let (context, sink) = context(dir.path());

        dispatch(&["tools"], &context).await.unwrap();
        let texts = sink.texts();
        assert_eq!(texts[0], "Tools (2):");
        assert!(texts[1].starts_with("  get_weather - "));
        assert!(texts[2].starts_with("  initiate_connection - "));
    }
}
