//! This module contains command dispatching logic for the menu.
//!
//! It maps command words to their respective handler functions.
mod agents;
mod connections;
mod logs;
mod tools;

pub use agents::register_agent;

use anyhow::Result;

use super::context::CommandContext;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub const COMMANDS: &[&str] = &[
    "register",
    "search",
    "connect",
    "connections",
    "send",
    "messages",
    "weather",
    "tools",
    "level",
    "filter",
    "unfilter",
    "verbose",
    "logs",
    "config",
    "relay",
    "info",
    "help",
    "exit",
];

/// Dispatches a command to the appropriate handler function.
///
/// # Arguments
///
/// * `parts` - The command word followed by its arguments.
/// * `context` - The `CommandContext` providing access to the application's services.
pub async fn dispatch(parts: &[&str], context: &CommandContext) -> Result<Flow> {
    let Some(command) = parts.first() else {
        return Ok(Flow::Continue);
    };

    match *command {
        "register" => agents::register(parts, context).await?,
        "search" => agents::search(parts, context).await?,
        "info" => agents::show_info(context).await?,
        "connect" => connections::connect(parts, context).await?,
        "connections" => connections::list(context).await?,
        "send" => connections::send(parts, context).await?,
        "messages" => connections::messages(parts, context).await?,
        "weather" => tools::weather(parts, context).await?,
        "tools" => tools::list(context),
        "level" => logs::set_level(parts, context),
        "filter" => logs::filter(parts, context, true),
        "unfilter" => logs::filter(parts, context, false),
        "verbose" => logs::verbose(parts, context),
        "logs" => logs::show_recent(parts, context),
        "config" => logs::show_config(context),
        "relay" => logs::relay(parts, context),
        "help" => show_help(context),
        "exit" | "quit" => {
            context.say("👋 Goodbye!");
            return Ok(Flow::Exit);
        }
        other => context.say(format!(
            "❌ Unknown command: {}. Type 'help' for available commands.",
            other
        )),
    }

    Ok(Flow::Continue)
}

fn show_help(context: &CommandContext) {
    context.say(
        "Available commands:
  register <name> [description]   - Register a new agent and save its credentials
  search <query>                  - Search for agents by name, description or capability
  connect <account_id> [memo]     - Send a connection request to an agent
  connections                     - List connections
  send <n> <message>              - Send a message over connection n
  messages <n>                    - Show new messages on connection n
  weather <city> [country]        - Run the weather tool
  tools                           - List available tools
  level <level>                   - Set the log level (error, warn, info, debug, trace)
  filter <module>                 - Hide all logs from a module
  unfilter <module>               - Show logs from a module again
  verbose <module>                - Hide debug/trace logs from a module
  logs [count]                    - Show recent log lines (default: 20)
  logs clear                      - Forget captured log lines
  config                          - Show the logger configuration
  relay <on|off>                  - Classify or pass through library output
  info                            - Show the active agent and network
  help                            - Show this help
  exit                            - Exit the application",
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logging::{
        Classifier, ConsoleRelay, Formatter, LogBuffer, Logger, LoggerConfig, MemorySink,
    };
    use crate::network::{AgentNetwork, InMemoryNetwork};
    use crate::tools::{InitiateConnectionTool, ToolRegistry, WeatherTool};
    use std::path::Path;
    use std::sync::Arc;

    pub(crate) fn context(data_dir: &Path) -> (CommandContext, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Arc::new(Logger::new(
            LoggerConfig {
                show_timestamp: false,
                ..LoggerConfig::default()
            },
            Classifier::builtin(false).unwrap(),
            Formatter::plain(),
            sink.clone(),
        ));
        let relay = Arc::new(ConsoleRelay::new(logger.clone()));
        relay.install();
        sink.clear();
        let network: Arc<dyn AgentNetwork> =
            Arc::new(InMemoryNetwork::with_residents("testnet", None));
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(WeatherTool::new()));
        tools.register(Box::new(InitiateConnectionTool::new(
            network.clone(),
            logger.clone(),
        )));

        let context = CommandContext::new(
            logger,
            relay,
            Arc::new(LogBuffer::new(50)),
            network,
            Arc::new(tools),
            data_dir,
        );
        (context, sink)
    }

    #[tokio::test]
    async fn unknown_command_prints_hint() {
        let dir = tempfile::TempDir::new().unwrap();
        let (context, sink) = context(dir.path());

        let flow = dispatch(&["dance"], &context).await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(sink.texts()[0].contains("Unknown command: dance"));
    }

    #[tokio::test]
    async fn exit_and_empty_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let (context, _sink) = context(dir.path());

        assert_eq!(dispatch(&[], &context).await.unwrap(), Flow::Continue);
        assert_eq!(dispatch(&["exit"], &context).await.unwrap(), Flow::Exit);
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let dir = tempfile::TempDir::new().unwrap();
        let (context, sink) = context(dir.path());

        dispatch(&["help"], &context).await.unwrap();
        let help = sink.texts().join("\n");
        for command in COMMANDS {
            assert!(help.contains(&format!("  {}", command)), "missing {command}");
        }
    }
}
