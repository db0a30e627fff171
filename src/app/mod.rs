pub mod args;
mod setup;

pub use args::AppArgs;

use crate::menu;
use anyhow::Result;

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp { args, context } = setup::prepare(args)?;

    if let Some(name) = args.register.as_deref() {
        menu::register_agent(&context, name, None).await?;
        return Ok(());
    }

    menu::run(context).await
}
