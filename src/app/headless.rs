//! Running the controller without a terminal UI.

use std::sync::Arc;

use color_eyre::Result;
use tracing::{info, warn};

use crate::adapters::LogSurface;
use crate::config::DashboardConfig;
use crate::controller::ConnectionSyncController;
use crate::traits::Connector;

/// Drive the controller until Ctrl-C, logging every display change.
pub async fn run_headless(config: &DashboardConfig, connector: Option<&dyn Connector>) -> Result<()> {
    let surface = Arc::new(LogSurface::new());
    let mut controller = ConnectionSyncController::from_config(config, surface);
    controller.initialize(connector);
    if controller.is_inert() {
        warn!("Nothing to do without a panel URL");
        return Ok(());
    }

    info!(location = controller.location().path(), "Running headless, press Ctrl-C to stop");
    loop {
        tokio::select! {
            alive = controller.tick() => {
                if !alive {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupted");
                break;
            }
        }
    }

    controller.teardown();
    Ok(())
}
