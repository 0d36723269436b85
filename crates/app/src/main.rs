use aegis_app::config::AegisConfig;
use aegis_app::runtime::{self, AppRuntimeOptions};
use aegis_foundation::ShutdownHandler;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "aegis.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(_guard);
    Ok(())
}

// The pipeline is cooperative: overlapping tasks on one scheduler, no
// parallel threads required.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging().map_err(|e| anyhow::anyhow!("logging init failed: {}", e))?;
    tracing::info!("Starting Aegis");

    let config = AegisConfig::load()?;
    tracing::info!(
        "Trigger armed: threshold {:.2}g, cooldown {}ms",
        config.shake.threshold,
        config.shake.cooldown_ms
    );

    let shutdown = ShutdownHandler::new().install().await;

    let handle = runtime::start(AppRuntimeOptions {
        config,
        ..Default::default()
    })
    .await?;

    tracing::info!("Aegis running; Ctrl-C to stop");
    shutdown.wait().await;

    handle.shutdown().await;
    Ok(())
}
