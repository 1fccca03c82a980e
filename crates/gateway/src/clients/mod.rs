//! gRPC clients for calling the catalog service.

mod catalog_client;

use async_trait::async_trait;

use common::AppResult;
use domain::{
    Category, CategoryNode, MoveCategory, NewCategory, NewProduct, Paginated, Product,
    ProductListOption, UpdateCategory, UpdateProduct,
};

pub use catalog_client::CatalogClient;

/// Result of a subtree deletion as reported by the catalog service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedSubtree {
    pub deleted_category_ids: Vec<i32>,
    pub affected_products: u64,
}

/// Catalog operations the handlers depend on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Whether the catalog service can reach its database
    async fn health(&self) -> AppResult<bool>;

    async fn list_categories(
        &self,
        category_id: i32,
        name: String,
        is_active: Option<bool>,
    ) -> AppResult<Vec<CategoryNode>>;

    async fn create_category(&self, new: NewCategory) -> AppResult<Category>;

    async fn update_category(&self, change: UpdateCategory) -> AppResult<Category>;

    async fn move_category(&self, change: MoveCategory) -> AppResult<Category>;

    async fn delete_category(
        &self,
        category_id: i32,
        delete_related_products: bool,
    ) -> AppResult<DeletedSubtree>;

    async fn create_product(&self, new: NewProduct) -> AppResult<Product>;

    /// Replace every editable field of an alive product
    async fn update_product(&self, change: UpdateProduct) -> AppResult<Product>;

    /// Exposed, alive product only
    async fn get_product(&self, id: i32) -> AppResult<Product>;

    async fn delete_product(&self, id: i32) -> AppResult<()>;

    async fn list_products(&self, option: ProductListOption) -> AppResult<Paginated<Product>>;
}
