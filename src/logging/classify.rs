//! Text classification for raw log lines: suppression, module detection and
//! cleanup.
//!
//! Rules are ordered lists scanned linearly. For module detection the first
//! matching rule decides the label, even if a later rule would also match.
use regex::Regex;

/// What a matching module rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleTarget {
    /// A fixed label.
    Label(&'static str),
    /// The text of the given capture group.
    Capture(usize),
}

#[derive(Debug, Clone)]
pub struct ModuleRule {
    pattern: Regex,
    target: ModuleTarget,
}

impl ModuleRule {
    pub fn new(pattern: &str, target: ModuleTarget) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            target,
        })
    }

    fn apply(&self, message: &str) -> Option<String> {
        let captures = self.pattern.captures(message)?;
        match self.target {
            ModuleTarget::Label(label) => Some(label.to_string()),
            ModuleTarget::Capture(group) => captures.get(group).map(|m| m.as_str().to_string()),
        }
    }
}

const MODULE_TOKEN: &str = r"\{\s*module:\s*'([^']+)'\s*\}";

const MODULE_RULES: &[(&str, ModuleTarget)] = &[
    (MODULE_TOKEN, ModuleTarget::Capture(1)),
    (r"HCS-\d+", ModuleTarget::Label("HCS")),
    (r"ConnectionTool", ModuleTarget::Label("Connection")),
    (r"Monitoring", ModuleTarget::Label("Monitor")),
    (r"(?i)connection request", ModuleTarget::Label("Connection")),
    (r"(?i)profile", ModuleTarget::Label("Profile")),
    (r"(?i)topic", ModuleTarget::Label("Topic")),
];

// Agent-framework tool and chain notices.
const FILTER_RULES: &[&str] = &[
    r"^Running \S+ with args",
    r"^Got output",
    r"^\{\}\s*$",
    r"^\[chain/start\]",
    r"^\[chain/end\]",
    r"^\[llm/start\]",
    r"^\[llm/end\]",
];

const LIFECYCLE_MARKERS: &[&str] = &[
    "[chain:",
    "[llm:",
    "Entering Chain run",
    "Exiting Chain run",
];

/// Decides what happens to a raw line before it is formatted.
#[derive(Debug, Clone)]
pub struct Classifier {
    module_rules: Vec<ModuleRule>,
    filters: Vec<Regex>,
    module_token: Regex,
    verbose_lifecycle: bool,
}

impl Classifier {
    /// Builds the classifier with the built-in rule set.
    ///
    /// `verbose_lifecycle` keeps chain/llm lifecycle chatter that is otherwise dropped.
    pub fn builtin(verbose_lifecycle: bool) -> Result<Self, regex::Error> {
        let module_rules = MODULE_RULES
            .iter()
            .map(|(pattern, target)| ModuleRule::new(pattern, *target))
            .collect::<Result<Vec<_>, _>>()?;
        let filters = FILTER_RULES
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            module_rules,
            filters,
            module_token: Regex::new(&format!(r"{}\s*", MODULE_TOKEN))?,
            verbose_lifecycle,
        })
    }

    /// Replaces the module rules, keeping filters and cleanup as they are.
    #[cfg(test)]
    pub fn with_module_rules(mut self, rules: Vec<ModuleRule>) -> Self {
        self.module_rules = rules;
        self
    }

    pub fn verbose_lifecycle(&self) -> bool {
        self.verbose_lifecycle
    }

    /// Returns true if the message should produce no output at all.
    pub fn should_suppress(&self, message: &str) -> bool {
        if message.is_empty() {
            return true;
        }

        if !self.verbose_lifecycle
            && LIFECYCLE_MARKERS
                .iter()
                .any(|marker| message.contains(marker))
        {
            return true;
        }

        self.filters.iter().any(|filter| filter.is_match(message))
    }

    /// Infers the originating module from the message text.
    pub fn detect_module(&self, message: &str) -> Option<String> {
        if message.is_empty() {
            return None;
        }
        self.module_rules
            .iter()
            .find_map(|rule| rule.apply(message))
    }

    /// Strips a `{ module: '<name>' }` token and surrounding whitespace.
    pub fn clean_message(&self, message: &str) -> String {
        self.module_token.replace(message, "").trim().to_string()
    }
}
