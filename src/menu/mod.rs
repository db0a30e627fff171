//! The interactive text menu.
//!
//! Each line is split on whitespace and handed to [`commands::dispatch`]. A
//! failing command is reported and the loop keeps going.
mod commands;
mod context;

pub use commands::register_agent;
pub use context::CommandContext;

use anyhow::Result;
use commands::Flow;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "hcs> ";

/// Runs the read-dispatch loop until `exit`, Ctrl-C or end of input.
///
/// # Errors
///
/// Returns an error if the line editor cannot be created or reading from the
/// terminal fails.
pub async fn run(context: CommandContext) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    context.say("Type 'help' for available commands.");

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                context.say("👋 Goodbye!");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        let parts: Vec<&str> = line.split_whitespace().collect();
        context
            .logger()
            .trace(&format!("Dispatching command: {}", parts[0]), Some("Menu"));
        match commands::dispatch(&parts, &context).await {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => context
                .logger()
                .error(&format!("❌ Error: {:#}", e), None),
        }
    }

    Ok(())
}
