use std::time::Duration;

use product_catalog::{
    build_app,
    infrastructure::{config::load_config, logger::Logger},
    AppState, AuthGate, ProductService,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = load_config()?;

    Logger::init(&config.logging);

    match &config_path {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    let product_service = ProductService::new();
    if config.catalog.seed_sample_data {
        product_service.seed_sample_data()?;
    }

    let auth = AuthGate::new(config.auth.api_token.clone());
    if !auth.is_enabled() {
        warn!("未配置 auth.api_token，写操作不做认证检查");
    }

    let state = AppState::new(product_service, auth);
    let app = build_app(state, Duration::from_secs(config.server.timeout_seconds));

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;

    info!("🚀 产品目录服务运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /products          - 产品列表 (category, search, page, limit)");
    info!("   GET    /products/stats    - 按分类统计");
    info!("   GET    /products/:id      - 获取特定产品");
    info!("   POST   /products          - 创建产品 (需认证)");
    info!("   PUT    /products/:id      - 更新产品 (需认证)");
    info!("   DELETE /products/:id      - 删除产品 (需认证)");
    info!("   GET    /health            - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号，正在停止服务...");
}
