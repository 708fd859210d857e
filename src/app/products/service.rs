//! 产品业务服务

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{
    model::{Fields, Product, ProductFilter},
    store::ProductStore,
    validation::validate_product,
};
use crate::core::{
    error::{CoreError, CoreResult},
    response::PageResponse,
};

/// 标识符生成器
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// 基于 UUID v4 的默认生成器
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// 持有产品存储的服务，所有写操作在同一把写锁内完成
#[derive(Clone)]
pub struct ProductService {
    store: Arc<RwLock<ProductStore>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for ProductService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductService {
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            store: Arc::new(RwLock::new(ProductStore::new())),
            ids: Arc::new(ids),
        }
    }

    pub fn count(&self) -> CoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn list_products(&self, filter: &ProductFilter) -> CoreResult<PageResponse<Product>> {
        Ok(self.read()?.list(filter))
    }

    pub fn get_product(&self, id: &str) -> CoreResult<Product> {
        self.read()?.get(id).cloned()
    }

    /// 校验后创建产品，标识符由服务生成
    pub fn create_product(&self, fields: Fields) -> CoreResult<Product> {
        validate_product(&fields)?;
        let product = Product::from_fields(self.ids.next_id(), fields);

        let mut store = self.write()?;
        let created = store.insert(product)?.clone();
        info!("创建产品: {} ({})", created.id, created.name);
        Ok(created)
    }

    /// 校验后对已有产品做浅合并
    pub fn update_product(&self, id: &str, fields: Fields) -> CoreResult<Product> {
        validate_product(&fields)?;

        let mut store = self.write()?;
        let updated = store.update(id, fields)?.clone();
        info!("更新产品: {}", id);
        Ok(updated)
    }

    pub fn delete_product(&self, id: &str) -> CoreResult<Product> {
        let removed = self.write()?.remove(id)?;
        info!("删除产品: {}", id);
        Ok(removed)
    }

    pub fn category_stats(&self) -> CoreResult<BTreeMap<String, usize>> {
        Ok(self.read()?.category_stats())
    }

    /// 写入几条示例数据
    pub fn seed_sample_data(&self) -> CoreResult<usize> {
        let samples = [
            json!({"name": "Laptop", "price": 1299.99, "category": "electronics", "stock": 12}),
            json!({"name": "Wireless Mouse", "price": 24.5, "category": "electronics"}),
            json!({"name": "Coffee Beans", "price": 14.0, "category": "grocery", "origin": "Ethiopia"}),
            json!({"name": "Green Tea", "price": 8.75, "category": "grocery"}),
            json!({"name": "Desk Lamp", "price": 39.9, "category": "home"}),
            json!({"name": "Notebook", "price": 3.2, "category": "stationery"}),
        ];

        for sample in samples {
            if let serde_json::Value::Object(fields) = sample {
                self.create_product(fields)?;
            }
        }

        let count = self.count()?;
        info!("✅ 已初始化 {} 个示例产品", count);
        Ok(count)
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, ProductStore>> {
        self.store
            .read()
            .map_err(|_| CoreError::InternalServerError("product store lock poisoned".to_string()))
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, ProductStore>> {
        self.store
            .write()
            .map_err(|_| CoreError::InternalServerError("product store lock poisoned".to_string()))
    }
}
