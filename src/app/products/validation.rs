//! 产品请求校验
//!
//! 只做存在性检查：`name`、`price`、`category` 必须出现且为"真值"。
//! 空字符串、`0`、`false` 和 `null` 都视为缺失，`price = 0` 因此会被拒绝。
//! 类型与取值范围不在这里检查。

use serde_json::Value;

use super::model::Fields;
use crate::core::error::CoreError;

pub const REQUIRED_FIELDS: [&str; 3] = ["name", "price", "category"];

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: name, price, or category";

pub fn validate_product(fields: &Fields) -> Result<(), CoreError> {
    let all_present = REQUIRED_FIELDS
        .iter()
        .all(|key| fields.get(*key).is_some_and(is_truthy));

    if all_present {
        Ok(())
    } else {
        Err(CoreError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
