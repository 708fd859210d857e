//! 内存产品存储
//!
//! 按插入顺序保存记录，删除不会改变其余记录的相对顺序。

use std::collections::BTreeMap;

use super::model::{Fields, Product, ProductFilter};
use crate::core::{error::CoreError, response::PageResponse};

pub const NOT_FOUND_MESSAGE: &str = "Product not found";

#[derive(Debug, Default, Clone)]
pub struct ProductStore {
    products: Vec<Product>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// 先按分类过滤，再按名称搜索（不区分大小写），最后分页
    pub fn list(&self, filter: &ProductFilter) -> PageResponse<Product> {
        let search = filter.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| filter.category.as_deref().map_or(true, |c| p.category == c))
            // 名称不是字符串的记录不参与搜索匹配
            .filter(|p| {
                search.as_deref().map_or(true, |s| {
                    p.name_str()
                        .is_some_and(|name| name.to_lowercase().contains(s))
                })
            })
            .collect();

        let total = matching.len();

        // page 为 0 时没有合法的偏移量，返回空页
        let products = match filter.page.checked_sub(1) {
            Some(index) => {
                let offset = index.saturating_mul(filter.limit);
                let offset = usize::try_from(offset).unwrap_or(usize::MAX);
                let limit = usize::try_from(filter.limit).unwrap_or(usize::MAX);
                matching
                    .into_iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect()
            }
            None => Vec::new(),
        };

        PageResponse {
            total,
            page: filter.page,
            products,
        }
    }

    pub fn get(&self, id: &str) -> Result<&Product, CoreError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(not_found)
    }

    pub fn insert(&mut self, product: Product) -> Result<&Product, CoreError> {
        if self.contains(&product.id) {
            return Err(CoreError::InternalServerError(format!(
                "duplicate product identifier generated: {}",
                product.id
            )));
        }

        self.products.push(product);
        self.products
            .last()
            .ok_or_else(|| CoreError::InternalServerError("insert lost product".to_string()))
    }

    pub fn update(&mut self, id: &str, fields: Fields) -> Result<&Product, CoreError> {
        let index = self.position(id).ok_or_else(not_found)?;
        self.products[index].merge(fields);
        Ok(&self.products[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<Product, CoreError> {
        let index = self.position(id).ok_or_else(not_found)?;
        Ok(self.products.remove(index))
    }

    /// 每个分类的记录数
    pub fn category_stats(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for product in &self.products {
            *stats.entry(product.category_key()).or_insert(0) += 1;
        }
        stats
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }
}

fn not_found() -> CoreError {
    CoreError::NotFound(NOT_FOUND_MESSAGE.to_string())
}
