//! Domain layer - Core catalog entities and pure algorithms.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! category and product types, the category tree builder and the
//! parent-index closure used for cascade deletion and subtree scoping.

pub mod category;
pub mod constants;
pub mod error;
pub mod hierarchy;
pub mod pagination;
pub mod product;
pub mod tree;

pub use category::{
    normalize_name, Category, CategoryFilter, DeletePolicy, MoveCategory, NewCategory,
    UpdateCategory,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use hierarchy::ParentIndex;
pub use pagination::{Paginated, PaginationMeta};
pub use product::{AliveFilter, NewProduct, Product, ProductListOption, UpdateProduct};
pub use tree::{build_forest, group_by_parent, CategoryNode};
