//! Product service - Handles product-related business logic.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult};
use domain::{NewProduct, Paginated, Product, ProductListOption, UpdateProduct};

use crate::repository::{CategoryRepository, ProductRepository};

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Create a product, optionally attached to an existing category
    async fn create_product(&self, new: NewProduct) -> AppResult<Product>;

    /// Edit an alive product, re-categorising it when `category_id` changes
    async fn update_product(&self, change: UpdateProduct) -> AppResult<Product>;

    /// Get a product; without `allow_deleted` only exposed, alive ones
    async fn get_product(&self, id: i32, allow_deleted: bool) -> AppResult<Product>;

    /// Soft delete product (sets deleted_at timestamp)
    async fn delete_product(&self, id: i32) -> AppResult<()>;

    /// Page through products. A category filter includes every
    /// descendant category.
    async fn list_products(&self, option: ProductListOption) -> AppResult<Paginated<Product>>;

    /// Count products matching the list filters
    async fn count_products(&self, option: ProductListOption) -> AppResult<u64>;
}

/// Concrete implementation of ProductService using repositories.
pub struct ProductManager {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ProductManager {
    /// Create new product service instance with repositories
    pub fn new(products: Arc<dyn ProductRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            products,
            categories,
        }
    }

    async fn ensure_category_exists(&self, category_id: Option<i32>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                return Err(AppError::validation(format!(
                    "Category {} does not exist",
                    category_id
                )));
            }
        }
        Ok(())
    }

    async fn category_scope(&self, option: &ProductListOption) -> AppResult<Option<Vec<i32>>> {
        match option.category_id {
            Some(category_id) => Ok(Some(self.categories.descendant_ids(category_id).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn create_product(&self, new: NewProduct) -> AppResult<Product> {
        let new = new.normalized()?;
        self.ensure_category_exists(new.category_id).await?;

        let product = self.products.create(new).await?;
        info!("Created product {} in category {:?}", product.id, product.category_id);
        Ok(product)
    }

    async fn update_product(&self, change: UpdateProduct) -> AppResult<Product> {
        let change = change.normalized()?;
        self.ensure_category_exists(change.category_id).await?;

        let product = self.products.update(change).await?;
        info!("Updated product {} in category {:?}", product.id, product.category_id);
        Ok(product)
    }

    async fn get_product(&self, id: i32, allow_deleted: bool) -> AppResult<Product> {
        self.products
            .find_by_id(id, allow_deleted)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        self.products.soft_delete(id).await?;
        info!("Soft deleted product {}", id);
        Ok(())
    }

    async fn list_products(&self, option: ProductListOption) -> AppResult<Paginated<Product>> {
        let option = option.normalized();
        let scope = self.category_scope(&option).await?;

        let total = self.products.count(option.clone(), scope.clone()).await?;
        let products = self.products.list(option.clone(), scope).await?;

        Ok(Paginated::new(products, option.page, option.unit, total))
    }

    async fn count_products(&self, option: ProductListOption) -> AppResult<u64> {
        let option = option.normalized();
        let scope = self.category_scope(&option).await?;
        self.products.count(option, scope).await
    }
}
