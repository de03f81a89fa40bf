use anyhow::Result;
use clap::Parser;
use panel_provisioner::app::http::router;
use panel_provisioner::core::ConfigProvider;
use panel_provisioner::utils::{logger, validation::Validate};
use panel_provisioner::{CliConfig, PanelConfig, Provisioner, PterodactylClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliConfig::parse();

    // 日誌設定在配置檔裡，載入失敗只能直接寫 stderr
    let mut config = match PanelConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(&config.logging, cli.verbose);

    tracing::info!("🚀 Starting panel-provisioner");
    tracing::info!("📁 Configuration loaded from: {}", cli.config);

    if let Some(bind) = cli.bind {
        tracing::info!("🔧 Bind address overridden to: {}", bind);
        config.http.bind = bind;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        "✅ Configuration loaded (panel: {}, timeout: {}s)",
        config.api_base(),
        config.request_timeout_seconds()
    );

    let client = PterodactylClient::from_config(&config)?;
    let provisioner = Arc::new(Provisioner::new(client, config.server_template()));
    let app = router(provisioner, config.route_path());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "listening on http://{}{}",
        listener.local_addr()?,
        config.route_path()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Shut down");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = term => {} }
}
