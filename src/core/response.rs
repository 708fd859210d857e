//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// 分页列表响应，`total` 为分页前的匹配总数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub total: usize,
    pub page: u64,
    pub products: Vec<T>,
}

/// 删除确认响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse<T> {
    pub message: String,
    pub product: T,
}

impl<T> DeleteResponse<T> {
    pub fn deleted(product: T) -> Self {
        Self {
            message: "Product deleted successfully".to_string(),
            product,
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub products_count: usize,
}

impl HealthResponse {
    pub fn healthy(products_count: usize) -> Self {
        Self {
            status: "healthy",
            timestamp: chrono::Utc::now().to_rfc3339(),
            products_count,
        }
    }
}
