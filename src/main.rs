// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, build the controller, hand it to the UI loop.
// - Returns `anyhow::Result` so setup failures print a readable message.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use fit4ever_cli::{
    config::{default_token_path, ClientConfig, DEFAULT_API_URL},
    controller::Controller,
    logging,
    session::FileTokenStore,
    ui::{main_menu, TerminalPresenter},
};

#[derive(Parser)]
#[command(name = "fit4ever", about = "Track workouts, nutrition and goals from the terminal")]
struct Cli {
    /// Base URL of the Fit4Ever API
    #[arg(long, env = "FIT4EVER_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// File holding the session token (defaults to ~/.fit4ever_token)
    #[arg(long, env = "FIT4EVER_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
    let config = ClientConfig::default()
        .with_base_url(&cli.api_url)
        .with_token_path(cli.token_file.unwrap_or_else(default_token_path))
        .with_request_timeout(timeout);

    let store = FileTokenStore::new(config.token_path.clone());
    let app = Controller::new(&config, store, TerminalPresenter::new())?;

    // Blocks until the user picks "Exit".
    main_menu(app).await?;
    Ok(())
}
