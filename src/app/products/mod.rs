//! 产品目录：内存存储、校验与 HTTP 处理器

pub mod handler;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use handler::{router, AppState};
pub use model::{Product, ProductFilter, ProductQuery};
pub use service::{IdGenerator, ProductService, UuidGenerator};
pub use store::ProductStore;
