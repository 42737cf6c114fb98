use anyhow::Context;
use clap::Parser;
use crew_vouchers::adapters::http;
use crew_vouchers::domain::ports::{ConfigProvider, VoucherRepository};
use crew_vouchers::utils::{logger, validation::Validate};
use crew_vouchers::{CliConfig, SqliteVoucherRepository, VoucherService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting crew-vouchers");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let config = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let repository = SqliteVoucherRepository::connect(config.database_url(), config.max_connections())
        .await
        .with_context(|| format!("failed to connect to database {}", config.database_url()))?;
    repository
        .ensure_schema()
        .await
        .context("failed to migrate database")?;

    let service = Arc::new(VoucherService::new(repository));
    let app = http::router(service, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    tracing::info!("🚀 Server listening on {}", config.listen_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("✅ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
