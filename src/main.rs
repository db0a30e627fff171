//! The main entry point for the hcs-agent console.
mod app;
mod credentials;
mod logging;
mod menu;
mod network;
mod tools;
mod types;

use anyhow::Result;

/// The main function of the application.
///
/// It parses the command line, sets up logging and the agent network, and
/// then either registers an agent and exits or starts the interactive menu.
///
/// # Errors
///
/// Returns an error if setup fails or the menu cannot read from the terminal.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    app::launch().await
}
