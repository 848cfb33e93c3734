use anyhow::Context;
use clap::Parser;
use interior_style::config::Credential;
use interior_style::utils::logger;
use interior_style::{
    build_router, AppConfig, AppState, GeminiVisionClient, LocalStorage, ServerArgs,
    StyleAnalyzer,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 只是可選的
    let _ = dotenvy::dotenv();

    let args = ServerArgs::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("Starting interior-style server");

    // 解析並驗證配置
    let config = match AppConfig::resolve(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match &config.vision.credential {
        Credential::Usable(_) => tracing::info!("Gemini API key configured"),
        Credential::Missing => tracing::warn!(
            "GEMINI_API_KEY not found; uploads will return a configuration error until it is set"
        ),
        Credential::Placeholder => tracing::warn!(
            "GEMINI_API_KEY is still a placeholder value; get a key from https://ai.google.dev/"
        ),
    }
    tracing::debug!(
        model = %config.vision.model,
        upload_dir = %config.upload_dir,
        color_analysis = config.include_color_analysis,
        "Resolved configuration"
    );

    let storage = LocalStorage::new(&config.upload_dir);
    storage
        .ensure_base_dir()
        .await
        .with_context(|| format!("failed to create upload directory {}", config.upload_dir))?;

    let client = Arc::new(GeminiVisionClient::new(config.vision.clone()));
    let analyzer = Arc::new(StyleAnalyzer::new(client, config.include_color_analysis));

    let shutdown = CancellationToken::new();
    let state = AppState::new(analyzer, storage, shutdown.clone());
    let app = build_router(state, &config.static_dir, config.max_upload_bytes());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, cancelling in-flight analyses");
    shutdown.cancel();
}
