//! Category Store: persistence of category records.
//!
//! No business rules beyond field shaping (trimmed names, default order);
//! existence of parents and cycle checks live in the service layer.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::SimpleExpr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::cascade::{self, CascadeOutcome};
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::infra::UnitOfWork;
use common::{AppError, AppResult};
use domain::{
    normalize_name, Category, CategoryFilter, DeletePolicy, MoveCategory, NewCategory,
    ParentIndex, UpdateCategory,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>>;

    /// List categories matching the filter, ordered by
    /// `(parent_id, view_order)` ascending
    async fn list_all(&self, filter: CategoryFilter) -> AppResult<Vec<Category>>;

    /// Load the full parent relation (unfiltered)
    async fn hierarchy(&self) -> AppResult<ParentIndex>;

    /// Persist a new category. The name is trimmed; an omitted
    /// `view_order` appends after the existing siblings.
    async fn create(&self, new: NewCategory) -> AppResult<Category>;

    /// Persist parent/name changes plus the optional fields
    async fn update(&self, change: UpdateCategory) -> AppResult<Category>;

    /// Re-parent a category and renumber its new siblings atomically
    async fn move_to(&self, change: MoveCategory) -> AppResult<Category>;

    /// Delete a category with its whole subtree in one transaction
    async fn delete_subtree(&self, root: i32, policy: DeletePolicy) -> AppResult<CascadeOutcome>;

    /// `root` plus every transitive descendant id
    async fn descendant_ids(&self, root: i32) -> AppResult<Vec<i32>>;
}

/// SeaORM-backed implementation of CategoryRepository
pub struct CategoryStore {
    db: DatabaseConnection,
    uow: UnitOfWork,
}

impl CategoryStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = UnitOfWork::new(db.clone());
        Self { db, uow }
    }
}

/// `parent_id = ?` that also matches the root level
fn same_parent(parent_id: Option<i32>) -> SimpleExpr {
    match parent_id {
        Some(parent_id) => category::Column::ParentId.eq(parent_id),
        None => category::Column::ParentId.is_null(),
    }
}

/// Next free `view_order` among the children of `parent_id`
async fn next_view_order<C>(conn: &C, parent_id: Option<i32>) -> AppResult<i32>
where
    C: ConnectionTrait,
{
    let siblings = CategoryEntity::find()
        .filter(same_parent(parent_id))
        .count(conn)
        .await?;

    i32::try_from(siblings).map_err(|_| AppError::internal("too many sibling categories"))
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn list_all(&self, filter: CategoryFilter) -> AppResult<Vec<Category>> {
        let mut query = CategoryEntity::find();
        if let Some(name) = filter.name.as_deref() {
            query = query.filter(category::Column::Name.contains(name));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(category::Column::IsActive.eq(is_active));
        }

        let models = query
            .order_by_asc(category::Column::ParentId)
            .order_by_asc(category::Column::ViewOrder)
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        // LIKE is case-insensitive on some backends; the name match is not
        Ok(models
            .into_iter()
            .map(Category::from)
            .filter(|c| filter.matches(c))
            .collect())
    }

    async fn hierarchy(&self) -> AppResult<ParentIndex> {
        let pairs: Vec<(i32, Option<i32>)> = CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::ParentId)
            .order_by_asc(category::Column::ViewOrder)
            .order_by_asc(category::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(ParentIndex::from_pairs(pairs))
    }

    async fn create(&self, new: NewCategory) -> AppResult<Category> {
        let name = normalize_name(&new.name)?;
        let view_order = match new.view_order {
            Some(view_order) => view_order,
            None => next_view_order(&self.db, new.parent_id).await?,
        };

        let active_model = ActiveModel {
            id: NotSet,
            parent_id: Set(new.parent_id),
            name: Set(name),
            is_active: Set(new.is_active.unwrap_or(true)),
            view_order: Set(view_order),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn update(&self, change: UpdateCategory) -> AppResult<Category> {
        let name = normalize_name(&change.name)?;
        let existing = CategoryEntity::find_by_id(change.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let reparented = existing.parent_id != change.parent_id;
        let mut active: ActiveModel = existing.into();

        active.parent_id = Set(change.parent_id);
        active.name = Set(name);
        if let Some(is_active) = change.is_active {
            active.is_active = Set(is_active);
        }
        match change.view_order {
            Some(view_order) => active.view_order = Set(view_order),
            // Land at the end of the new sibling list
            None if reparented => {
                active.view_order = Set(next_view_order(&self.db, change.parent_id).await?)
            }
            None => {}
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn move_to(&self, change: MoveCategory) -> AppResult<Category> {
        self.uow
            .transaction(move |txn| {
                Box::pin(async move {
                    let target = CategoryEntity::find_by_id(change.id)
                        .one(txn)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    let mut lineup = CategoryEntity::find()
                        .filter(same_parent(change.parent_id))
                        .filter(category::Column::Id.ne(change.id))
                        .order_by_asc(category::Column::ViewOrder)
                        .order_by_asc(category::Column::Id)
                        .all(txn)
                        .await?;

                    let position = change.position.min(lineup.len());
                    lineup.insert(position, target);

                    let mut moved = None;
                    for (index, model) in lineup.into_iter().enumerate() {
                        let view_order = index as i32;
                        if model.id == change.id {
                            let mut active: ActiveModel = model.into();
                            active.parent_id = Set(change.parent_id);
                            active.view_order = Set(view_order);
                            moved = Some(active.update(txn).await?);
                        } else if model.view_order != view_order {
                            let mut active: ActiveModel = model.into();
                            active.view_order = Set(view_order);
                            active.update(txn).await?;
                        }
                    }

                    moved
                        .map(Category::from)
                        .ok_or_else(|| AppError::internal("moved category missing from lineup"))
                })
            })
            .await
    }

    async fn delete_subtree(&self, root: i32, policy: DeletePolicy) -> AppResult<CascadeOutcome> {
        self.uow
            .transaction(move |txn| {
                Box::pin(async move { cascade::delete_subtree(txn, root, policy).await })
            })
            .await
    }

    async fn descendant_ids(&self, root: i32) -> AppResult<Vec<i32>> {
        cascade::resolve_subtree(&self.db, root).await
    }
}
