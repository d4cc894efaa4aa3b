//! Chart runtime entry point.

use anyhow::{Context, Result};
use tracing::info;

use chart_runtime::container::RuntimeConfig;
use chart_runtime::ChartRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    chart_telemetry::init_telemetry(&config.telemetry).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  AnyChart Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let runtime = ChartRuntime::new(config).context("Failed to build runtime")?;
    let mut stdout = std::io::stdout();

    // Dropping the run future on Ctrl-C drops any live subscription,
    // which cancels its driver task.
    tokio::select! {
        result = runtime.run(&mut stdout) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Shutdown signal received");
        }
    }

    info!("Runtime stopped");
    Ok(())
}
