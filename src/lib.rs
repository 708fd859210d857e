//! # 产品目录 REST API
//!
//! 基于 Axum 的内存产品目录服务，提供：
//! - 产品的增删改查
//! - 分类过滤、名称搜索与分页
//! - 按分类统计
//! - 统一的 JSON 错误响应

pub mod app;
pub mod core;
pub mod infrastructure;

use std::time::Duration;

use axum::{middleware, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use app::products::{AppState, Product, ProductService};
pub use crate::core::error::{CoreError, CoreResult};
pub use crate::core::middleware::AuthGate;

/// 组装完整应用：产品路由加上日志、追踪、CORS、超时、错误正文改写和 panic 兜底中间件
pub fn build_app(state: AppState, timeout: Duration) -> Router {
    app::products::router(state)
        .layer(CatchPanicLayer::custom(crate::core::middleware::panic_response))
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(
            crate::core::middleware::json_error_body,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            crate::core::middleware::request_logging_middleware,
        ))
}
