//! 产品数据模型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::CoreError;

/// 请求体中的原始字段映射
pub type Fields = Map<String, Value>;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 5;

/// 产品记录：固定字段加上客户端提供的任意附加字段
///
/// `name`、`price`、`category` 按客户端提交的 JSON 原样保存，不做类型转换。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: Value,
    pub price: Value,
    pub category: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// 由生成的标识符和客户端字段构造新记录，客户端的 `id` 被忽略
    pub fn from_fields(id: String, fields: Fields) -> Self {
        let mut product = Product {
            id,
            name: Value::Null,
            price: Value::Null,
            category: Value::Null,
            extra: Map::new(),
        };
        product.merge(fields);
        product
    }

    /// 浅合并：请求中出现的字段覆盖原值，未出现的字段保持不变
    pub fn merge(&mut self, mut fields: Fields) {
        fields.remove("id");

        if let Some(name) = fields.remove("name") {
            self.name = name;
        }
        if let Some(price) = fields.remove("price") {
            self.price = price;
        }
        if let Some(category) = fields.remove("category") {
            self.category = category;
        }
        self.extra.extend(fields);
    }

    /// 名称不是字符串时返回 `None`
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_str()
    }

    /// 统计用的分类键：字符串取原文，其余类型取 JSON 文本
    pub fn category_key(&self) -> String {
        match &self.category {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// 列表查询参数（原始字符串形式）
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// 解析后的列表过滤与分页条件
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TryFrom<ProductQuery> for ProductFilter {
    type Error = CoreError;

    fn try_from(query: ProductQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            category: query.category.filter(|c| !c.is_empty()),
            search: query.search.filter(|s| !s.is_empty()),
            page: parse_number("page", query.page, DEFAULT_PAGE)?,
            limit: parse_number("limit", query.limit, DEFAULT_LIMIT)?,
        })
    }
}

fn parse_number(name: &str, raw: Option<String>, default: u64) -> Result<u64, CoreError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| CoreError::BadRequest(format!("Invalid pagination parameter: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_fields_ignores_client_id() {
        let product = Product::from_fields(
            "generated".to_string(),
            fields(json!({"id": "client", "name": "Apple", "price": 1.5, "category": "fruit"})),
        );

        assert_eq!(product.id, "generated");
        assert_eq!(product.name, "Apple");
        assert!(product.extra.get("id").is_none());
    }

    #[test]
    fn test_fields_are_stored_verbatim() {
        let product = Product::from_fields(
            "p1".to_string(),
            fields(json!({"name": "Apple", "price": 2, "category": "fruit", "color": "red"})),
        );

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["color"], "red");
        assert_eq!(value["id"], "p1");
        assert_eq!(value["price"], json!(2));
        assert!(value["price"].is_u64());
    }

    #[test]
    fn test_non_numeric_price_and_non_string_name_are_kept() {
        let product = Product::from_fields(
            "p1".to_string(),
            fields(json!({"name": 123, "price": "10", "category": ["a", "b"]})),
        );

        assert_eq!(product.price, json!("10"));
        assert_eq!(product.name, json!(123));
        assert_eq!(product.name_str(), None);
        assert_eq!(product.category_key(), r#"["a","b"]"#);
    }

    #[test]
    fn test_large_integer_price_keeps_precision() {
        let product = Product::from_fields(
            "p1".to_string(),
            fields(json!({"name": "Big", "price": 9007199254740993u64, "category": "x"})),
        );

        assert_eq!(product.price.as_u64(), Some(9007199254740993));
    }

    #[test]
    fn test_merge_preserves_unnamed_fields() {
        let mut product = Product::from_fields(
            "p1".to_string(),
            fields(json!({"name": "Apple", "price": 2, "category": "fruit", "color": "red"})),
        );

        product.merge(fields(json!({"price": 3, "origin": "NZ", "id": "hijack"})));

        assert_eq!(product.id, "p1");
        assert_eq!(product.name, "Apple");
        assert_eq!(product.price, json!(3));
        assert_eq!(product.category_key(), "fruit");
        assert_eq!(product.extra["color"], "red");
        assert_eq!(product.extra["origin"], "NZ");
    }

    #[test]
    fn test_filter_defaults() {
        let filter = ProductFilter::try_from(ProductQuery::default()).unwrap();
        assert_eq!(filter, ProductFilter::default());
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 5);
    }

    #[test]
    fn test_filter_parses_numbers_and_drops_empty_strings() {
        let filter = ProductFilter::try_from(ProductQuery {
            category: Some(String::new()),
            search: Some("App".to_string()),
            page: Some("2".to_string()),
            limit: Some("0".to_string()),
        })
        .unwrap();

        assert_eq!(filter.category, None);
        assert_eq!(filter.search.as_deref(), Some("App"));
        assert_eq!(filter.page, 2);
        assert_eq!(filter.limit, 0);
    }

    #[test]
    fn test_filter_rejects_non_numeric_page() {
        let err = ProductFilter::try_from(ProductQuery {
            page: Some("abc".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, CoreError::BadRequest(msg) if msg.contains("page")));
    }
}
