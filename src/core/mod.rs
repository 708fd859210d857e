//! 核心模块：错误、中间件与响应结构

pub mod error;
pub mod middleware;
pub mod response;
