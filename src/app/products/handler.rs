//! 产品处理器与路由

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRef, Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};

use super::{
    model::{Fields, Product, ProductFilter, ProductQuery},
    service::ProductService,
};
use crate::core::{
    error::{CoreError, CoreResult},
    middleware::{auth_middleware, AuthGate},
    response::{DeleteResponse, HealthResponse, PageResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub auth: AuthGate,
}

impl AppState {
    pub fn new(product_service: ProductService, auth: AuthGate) -> Self {
        Self {
            product_service,
            auth,
        }
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// 产品路由：读操作公开，写操作经过认证中间件
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/products", get(list_products))
        .route("/products/stats", get(product_stats))
        .route("/products/:id", get(get_product));

    let protected = Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .route("/health", get(health_check))
        .fallback(route_not_found)
        .with_state(state)
}

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> CoreResult<Json<PageResponse<Product>>> {
    let Query(query) = query?;
    let filter = ProductFilter::try_from(query)?;
    let page = state.product_service.list_products(&filter)?;
    Ok(Json(page))
}

pub async fn product_stats(
    State(state): State<AppState>,
) -> CoreResult<Json<BTreeMap<String, usize>>> {
    Ok(Json(state.product_service.category_stats()?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CoreResult<Json<Product>> {
    Ok(Json(state.product_service.get_product(&id)?))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> CoreResult<(StatusCode, Json<Product>)> {
    let Json(fields) = payload?;
    let product = state.product_service.create_product(fields)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> CoreResult<Json<Product>> {
    let Json(fields) = payload?;
    Ok(Json(state.product_service.update_product(&id, fields)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CoreResult<Json<DeleteResponse<Product>>> {
    let product = state.product_service.delete_product(&id)?;
    Ok(Json(DeleteResponse::deleted(product)))
}

pub async fn health_check(State(state): State<AppState>) -> CoreResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse::healthy(state.product_service.count()?)))
}

async fn route_not_found() -> CoreError {
    CoreError::NotFound("Route not found".to_string())
}
