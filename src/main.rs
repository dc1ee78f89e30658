use clap::Parser;
use gari_map::core::GeometrySource;
use gari_map::utils::{logger, validation::Validate};
use gari_map::{
    api, CliConfig, FeatureCollectionAssembler, GeoapifyIsolineProvider, GeometryBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(
        cli.verbose,
        config.logging.level.as_deref(),
        config.logging.format,
    );
    tracing::info!("Starting gari-map server");
    if cli.verbose {
        tracing::debug!("Server config: {:?}", config.server);
    }

    // 驗證配置：缺少 API 金鑰或資料來源設定時直接拒絕啟動
    if let Err(e) = config.validate() {
        tracing::error!(
            "❌ Configuration validation failed (category: {:?}): {}",
            e.category(),
            e
        );
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let source = GeometryBackend::from_config(&config)?;
    tracing::info!("📦 Geometry source: {}", source.name());
    let isolines = GeoapifyIsolineProvider::new(&config.isoline);
    let assembler = Arc::new(FeatureCollectionAssembler::new(source, isolines));

    let app = api::build_router(assembler, &config.server);

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        "✅ Listening on http://{} (map data at {})",
        listener.local_addr()?,
        config.server.map_data_path
    );
    axum::serve(listener, app).await?;

    Ok(())
}
