//! Repository layer for data access.

mod cascade;
mod category_repository;
pub mod entities;
mod product_repository;

pub use cascade::CascadeOutcome;
pub use category_repository::{CategoryRepository, CategoryStore};
pub use product_repository::{ProductRepository, ProductStore};

#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
