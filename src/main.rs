use std::sync::Arc;

use color_eyre::Result;
use tracing::{info, warn};

use guild_dash::adapters::{ReqwestHttpClient, SocketIoConnector};
use guild_dash::app::{run_headless, App};
use guild_dash::cli::{parse_args, run_cli_command};
use guild_dash::clipboard::select_clipboard_writer;
use guild_dash::config::DashboardConfig;
use guild_dash::logging::init_logging;
use guild_dash::terminal::{setup_panic_hook, TerminalManager};
use guild_dash::traits::Connector;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Informational flags exit before anything touches the terminal
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("guild-dash: {}\n\n{}", e, guild_dash::cli::USAGE);
            std::process::exit(2);
        }
    };
    let options = run_cli_command(command);
    let config = options.apply(DashboardConfig::from_env());

    init_logging(config.headless)?;
    info!(
        version = guild_dash::cli::VERSION,
        url = ?config.base_url,
        guild = ?config.guild_id,
        "Starting guild-dash"
    );

    let connector = build_connector(&config);
    let connector = connector.as_ref().map(|c| c as &dyn Connector);

    if config.headless {
        return run_headless(&config, connector).await;
    }

    setup_panic_hook();
    let mut app = App::new(
        config,
        Arc::new(ReqwestHttpClient::new()),
        select_clipboard_writer(),
    )?;

    let mut term_manager = TerminalManager::new()?;
    app.start(connector);
    let result = app.run(term_manager.terminal()).await;
    term_manager.restore()?;
    result
}

/// The realtime connector, when a usable panel URL is configured.
fn build_connector(config: &DashboardConfig) -> Option<SocketIoConnector> {
    let base_url = config.base_url.as_deref()?;
    match SocketIoConnector::new(base_url) {
        Ok(connector) => Some(match config.session_cookie.as_deref() {
            Some(cookie) => connector.with_session_cookie(cookie),
            None => connector,
        }),
        Err(e) => {
            warn!(error = %e, "Invalid panel URL, live updates disabled");
            None
        }
    }
}
