//! Command handlers that inspect and reconfigure logging.
use crate::logging::{LogLevel, LoggerOptions};

use super::super::context::CommandContext;

const DEFAULT_TAIL: usize = 20;

pub fn set_level(parts: &[&str], context: &CommandContext) {
    let Some(name) = parts.get(1) else {
        context.say("Usage: level <error|warn|info|debug|trace>");
        return;
    };

    // Unknown names keep the current level; configure reports them.
    let config = context
        .logger()
        .configure(LoggerOptions::with_level(*name));
    context.say(format!("Log level: {}", config.level));
}

pub fn filter(parts: &[&str], context: &CommandContext, hide: bool) {
    let Some(module) = parts.get(1) else {
        context.say(if hide {
            "Usage: filter <module>"
        } else {
            "Usage: unfilter <module>"
        });
        return;
    };

    let mut modules = context.logger().config().filtered_modules;
    if hide {
        modules.insert(module.to_string());
    } else {
        modules.remove(*module);
    }

    let config = context.logger().configure(LoggerOptions {
        filtered_modules: Some(modules),
        ..LoggerOptions::default()
    });
    context.say(format!("Filtered modules: {}", join_or_none(&config.filtered_modules)));
}

pub fn verbose(parts: &[&str], context: &CommandContext) {
    let Some(module) = parts.get(1) else {
        context.say("Usage: verbose <module>");
        return;
    };

    let mut modules = context.logger().config().verbose_modules;
    modules.insert(module.to_string());
    let config = context.logger().configure(LoggerOptions {
        verbose_modules: Some(modules),
        ..LoggerOptions::default()
    });
    context.say(format!("Verbose modules: {}", join_or_none(&config.verbose_modules)));
}

pub fn show_recent(parts: &[&str], context: &CommandContext) {
    if parts.get(1) == Some(&"clear") {
        context.buffer().clear();
        context.say("Log buffer cleared.");
        return;
    }

    let count = match parts.get(1).map(|raw| raw.parse::<usize>()) {
        None => DEFAULT_TAIL,
        Some(Ok(count)) => count,
        Some(Err(_)) => {
            context.say("Usage: logs [count|clear]");
            return;
        }
    };

    let buffer = context.buffer();
    if buffer.is_empty() {
        context.say("No log lines captured yet.");
        return;
    }

    let recent = buffer.recent(count);
    let mut output = format!("Last {} of {} log lines:", recent.len(), buffer.len());
    for (_, line) in recent {
        output.push('\n');
        output.push_str(&line);
    }
    context.say(output);
}

pub fn show_config(context: &CommandContext) {
    let config = context.logger().config();
    let levels = LogLevel::ALL
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join("/");

    context.say(format!(
        "Logger configuration:
  level: {} ({})
  showTimestamp: {}
  showModule: {}
  compactMode: {}
  filteredModules: {}
  verboseModules: {}
  verboseDebug: {}",
        config.level,
        levels,
        config.show_timestamp,
        config.show_module,
        config.compact_mode,
        join_or_none(&config.filtered_modules),
        join_or_none(&config.verbose_modules),
        context.logger().classifier().verbose_lifecycle(),
    ));
}

pub fn relay(parts: &[&str], context: &CommandContext) {
    match parts.get(1).copied() {
        Some("on") => {
            if !context.relay().install() {
                context.say("Console relay already installed.");
            }
        }
        Some("off") => {
            if !context.relay().uninstall() {
                context.say("Console relay is not installed.");
            }
        }
        _ => context.say("Usage: relay <on|off>"),
    }
}

fn join_or_none(modules: &std::collections::BTreeSet<String>) -> String {
    if modules.is_empty() {
        "(none)".to_string()
    } else {
        modules.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
