//! Service layer - business logic over the repositories.

mod category_service;
mod product_service;

pub use category_service::{CategoryManager, CategoryService};
pub use product_service::{ProductManager, ProductService};
