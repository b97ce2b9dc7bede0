// Entrypoint for the CLI application.
// - Keeps `main` small: load config, build the client, hand it to the UI
//   loop.
// - Returns `anyhow::Result` so construction failures print with context.

use grafdash_cli::{api::GrafanaClient, config::Config, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grafdash_cli=info")),
        )
        .init();

    // Credentials come exclusively from the environment; see
    // `Config::from_env` for the required variables.
    let config = Config::from_env()?;
    let api = GrafanaClient::new(&config)?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
