use clap::{Parser, ValueEnum};
use std::fmt;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkName {
    Testnet,
    Mainnet,
    Previewnet,
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetworkName::Testnet => "testnet",
            NetworkName::Mainnet => "mainnet",
            NetworkName::Previewnet => "previewnet",
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hcs-agent")]
#[command(about = "Register, discover and chat with agents from a text menu")]
pub struct AppArgs {
    #[arg(long, env = "HEDERA_ACCOUNT_ID", help = "Operator account id")]
    pub account_id: Option<String>,

    #[arg(
        long,
        env = "HEDERA_PRIVATE_KEY",
        hide_env_values = true,
        help = "Operator private key"
    )]
    pub private_key: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Read operator credentials from a saved credentials file (overrides --account-id)"
    )]
    pub credentials: Option<String>,

    #[arg(long, env = "HEDERA_NETWORK", value_enum, default_value_t = NetworkName::Testnet)]
    pub network: NetworkName,

    #[arg(
        long,
        env = "LOG_LEVEL",
        default_value = "info",
        help = "Minimum level: error, warn, info, debug or trace"
    )]
    pub log_level: String,

    #[arg(long, help = "JSON file with logger options (level, showTimestamp, ...)")]
    pub log_config: Option<String>,

    #[arg(
        long,
        env = "VERBOSE_DEBUG",
        help = "Keep chain/llm lifecycle messages from library output"
    )]
    pub verbose_debug: bool,

    #[arg(long, help = "Disable ANSI colours")]
    pub no_color: bool,

    #[arg(long, default_value = ".", help = "Directory for credential files")]
    pub data_dir: String,

    #[arg(
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = "FaustoAgent",
        help = "Register an agent and exit (default name: FaustoAgent)"
    )]
    pub register: Option<String>,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}
