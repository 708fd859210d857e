//! 业务模块

pub mod products;
