//! Product repository implementation with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::{AppError, AppResult};
use domain::{AliveFilter, NewProduct, Product, ProductListOption, UpdateProduct};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
///
/// `category_ids` is the already resolved category closure; `None` means
/// any category (including none).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, new: NewProduct) -> AppResult<Product>;

    /// Replace the editable fields of an alive product
    async fn update(&self, change: UpdateProduct) -> AppResult<Product>;

    /// Find product by ID. Without `allow_deleted` only exposed, alive
    /// products are returned.
    async fn find_by_id(&self, id: i32, allow_deleted: bool) -> AppResult<Option<Product>>;

    /// Soft delete product by ID (sets deleted_at timestamp)
    async fn soft_delete(&self, id: i32) -> AppResult<()>;

    /// One page of products, newest first
    async fn list(
        &self,
        option: ProductListOption,
        category_ids: Option<Vec<i32>>,
    ) -> AppResult<Vec<Product>>;

    /// Number of products matching the same filters as `list`
    async fn count(
        &self,
        option: ProductListOption,
        category_ids: Option<Vec<i32>>,
    ) -> AppResult<u64>;
}

/// Concrete implementation of ProductRepository with soft delete
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn filtered(option: &ProductListOption, category_ids: Option<Vec<i32>>) -> Select<ProductEntity> {
    let mut query = ProductEntity::find();

    if let Some(name) = option.name.as_deref() {
        query = query.filter(product::Column::Name.contains(name));
    }
    if let Some(ids) = category_ids {
        query = query.filter(product::Column::CategoryId.is_in(ids));
    }
    match option.alive {
        AliveFilter::Alive => query = query.filter(product::Column::DeletedAt.is_null()),
        AliveFilter::Deleted => query = query.filter(product::Column::DeletedAt.is_not_null()),
        AliveFilter::All => {}
    }

    query
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn create(&self, new: NewProduct) -> AppResult<Product> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            category_id: Set(new.category_id),
            name: Set(new.name),
            model_name: Set(new.model_name),
            price: Set(new.price),
            stock_count: Set(new.stock_count),
            exposed_at: Set(new.exposed.then_some(now)),
            created_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, change: UpdateProduct) -> AppResult<Product> {
        let product = ProductEntity::find_by_id(change.id)
            .filter(product::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        // Re-exposing keeps the original exposure time
        let exposed_at = match (change.exposed, product.exposed_at) {
            (true, Some(at)) => Some(at),
            (true, None) => Some(Utc::now()),
            (false, _) => None,
        };

        let mut active: ActiveModel = product.into();
        active.category_id = Set(change.category_id);
        active.name = Set(change.name);
        active.model_name = Set(change.model_name);
        active.price = Set(change.price);
        active.stock_count = Set(change.stock_count);
        active.exposed_at = Set(exposed_at);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn find_by_id(&self, id: i32, allow_deleted: bool) -> AppResult<Option<Product>> {
        let mut query = ProductEntity::find_by_id(id);
        if !allow_deleted {
            query = query
                .filter(product::Column::ExposedAt.is_not_null())
                .filter(product::Column::DeletedAt.is_null());
        }

        let result = query.one(&self.db).await.map_err(AppError::from)?;
        Ok(result.map(Product::from))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let product = ProductEntity::find_by_id(id)
            .filter(product::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = product.into();
        active.deleted_at = Set(Some(Utc::now()));

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn list(
        &self,
        option: ProductListOption,
        category_ids: Option<Vec<i32>>,
    ) -> AppResult<Vec<Product>> {
        let models = filtered(&option, category_ids)
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .offset(option.offset())
            .limit(option.unit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn count(
        &self,
        option: ProductListOption,
        category_ids: Option<Vec<i32>>,
    ) -> AppResult<u64> {
        filtered(&option, category_ids)
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
