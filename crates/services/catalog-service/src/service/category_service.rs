//! Category service - validation and orchestration over the Category Store.
//!
//! Parent existence and cycle checks happen here against a freshly loaded
//! [`ParentIndex`]; the store itself only shapes fields.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult};
use domain::{
    build_forest, Category, CategoryFilter, CategoryNode, DeletePolicy, MoveCategory,
    NewCategory, UpdateCategory, ALL_CATEGORIES,
};

use crate::repository::{CascadeOutcome, CategoryRepository};

/// Category service trait for dependency injection.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Create a category under an existing parent (or at root level)
    async fn create_category(&self, new: NewCategory) -> AppResult<Category>;

    /// Rename, re-parent or toggle a category
    async fn update_category(&self, change: UpdateCategory) -> AppResult<Category>;

    /// Drag-and-drop move: new parent plus position among its children
    async fn move_category(&self, change: MoveCategory) -> AppResult<Category>;

    /// Delete a category and its subtree, detaching or soft deleting
    /// the products attached to it
    async fn delete_category(
        &self,
        category_id: i32,
        delete_related_products: bool,
    ) -> AppResult<CascadeOutcome>;

    /// Filtered category rows in view order. `category_id == 0` lists
    /// everything, any other id scopes the result to that subtree.
    async fn list_category_rows(
        &self,
        category_id: i32,
        name: &str,
        is_active: Option<bool>,
    ) -> AppResult<Vec<Category>>;

    /// Same rows as [`list_category_rows`](Self::list_category_rows),
    /// nested into a forest
    async fn list_category(
        &self,
        category_id: i32,
        name: &str,
        is_active: Option<bool>,
    ) -> AppResult<Vec<CategoryNode>> {
        let categories = self
            .list_category_rows(category_id, name, is_active)
            .await?;
        Ok(build_forest(&categories)?)
    }
}

/// Concrete implementation of CategoryService using repository.
pub struct CategoryManager {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryManager {
    /// Create new category service instance with repository
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_parent_exists(&self, parent_id: Option<i32>) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        if self.repo.find_by_id(parent_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Parent category {} does not exist",
                parent_id
            )));
        }
        Ok(())
    }

    /// Existing category + valid, acyclic new parent
    async fn ensure_reparent_allowed(&self, id: i32, parent_id: Option<i32>) -> AppResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        self.ensure_parent_exists(parent_id).await?;
        if parent_id.is_some() {
            let index = self.repo.hierarchy().await?;
            index.ensure_acyclic_move(id, parent_id)?;
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn create_category(&self, new: NewCategory) -> AppResult<Category> {
        let new = new.normalized()?;
        self.ensure_parent_exists(new.parent_id).await?;

        let category = self.repo.create(new).await?;
        info!(
            "Created category {} ({:?}) under {:?}",
            category.id, category.name, category.parent_id
        );
        Ok(category)
    }

    async fn update_category(&self, change: UpdateCategory) -> AppResult<Category> {
        let change = change.normalized()?;
        self.ensure_reparent_allowed(change.id, change.parent_id)
            .await?;

        let category = self.repo.update(change).await?;
        info!("Updated category {}", category.id);
        Ok(category)
    }

    async fn move_category(&self, change: MoveCategory) -> AppResult<Category> {
        change.validate()?;
        self.ensure_reparent_allowed(change.id, change.parent_id)
            .await?;

        let category = self.repo.move_to(change).await?;
        info!(
            "Moved category {} under {:?} at position {}",
            category.id, category.parent_id, category.view_order
        );
        Ok(category)
    }

    async fn delete_category(
        &self,
        category_id: i32,
        delete_related_products: bool,
    ) -> AppResult<CascadeOutcome> {
        if category_id <= 0 {
            return Err(AppError::validation("Category id is not valid"));
        }

        let policy = DeletePolicy::from_flag(delete_related_products);
        let outcome = self.repo.delete_subtree(category_id, policy).await?;
        info!(
            "Deleted category {} with {} descendants, {} products {}",
            category_id,
            outcome.deleted_category_ids.len().saturating_sub(1),
            outcome.affected_products,
            match policy {
                DeletePolicy::DetachProducts => "detached",
                DeletePolicy::SoftDeleteProducts => "soft deleted",
            }
        );
        Ok(outcome)
    }

    async fn list_category_rows(
        &self,
        category_id: i32,
        name: &str,
        is_active: Option<bool>,
    ) -> AppResult<Vec<Category>> {
        let filter = CategoryFilter::new(name, is_active);

        let categories = if category_id == ALL_CATEGORIES {
            self.repo.list_all(filter).await?
        } else if category_id < 0 {
            return Err(AppError::validation("Category id is not valid"));
        } else {
            // Scope over the unfiltered hierarchy, then apply the filter
            let index = self.repo.hierarchy().await?;
            let scope: HashSet<i32> = index.subtree(category_id)?.into_iter().collect();
            let mut categories = self.repo.list_all(filter).await?;
            categories.retain(|c| scope.contains(&c.id));
            categories
        };

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::ParentIndex;
    use mockall::predicate::eq;

    use crate::repository::MockCategoryRepository;

    fn category(id: i32, parent_id: Option<i32>, name: &str, view_order: i32) -> Category {
        Category {
            id,
            parent_id,
            name: name.to_string(),
            is_active: true,
            view_order,
            created_at: Utc::now(),
        }
    }

    /// 1 -> 2 -> 3, 4 (separate root)
    fn sample_tree() -> Vec<Category> {
        vec![
            category(1, None, "Root", 0),
            category(4, None, "Other", 1),
            category(2, Some(1), "Parent", 0),
            category(3, Some(2), "Leaf", 0),
        ]
    }

    fn sample_index() -> ParentIndex {
        ParentIndex::from_categories(&sample_tree())
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_touching_store() {
        let repo = MockCategoryRepository::new();
        let service = CategoryManager::new(Arc::new(repo));

        let result = service
            .create_category(NewCategory {
                name: "   ".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_rejects_missing_parent() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id().with(eq(9)).returning(|_| Ok(None));
        repo.expect_create().never();
        let service = CategoryManager::new(Arc::new(repo));

        let result = service
            .create_category(NewCategory {
                parent_id: Some(9),
                name: "Shoes".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_passes_trimmed_name_to_store() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create()
            .withf(|new| new.name == "Shoes" && new.parent_id.is_none())
            .returning(|new| Ok(category(10, new.parent_id, &new.name, 0)));
        let service = CategoryManager::new(Arc::new(repo));

        let created = service
            .create_category(NewCategory {
                name: "  Shoes ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.id, 10);
        assert_eq!(created.name, "Shoes");
    }

    #[tokio::test]
    async fn update_under_own_descendant_is_a_cycle() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(sample_tree().into_iter().find(|c| c.id == id)));
        repo.expect_hierarchy().returning(|| Ok(sample_index()));
        repo.expect_update().never();
        let service = CategoryManager::new(Arc::new(repo));

        let result = service
            .update_category(UpdateCategory {
                id: 1,
                parent_id: Some(3),
                name: "Root".to_string(),
                is_active: None,
                view_order: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::CycleDetected(1))));
    }

    #[tokio::test]
    async fn update_of_unknown_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = CategoryManager::new(Arc::new(repo));

        let result = service
            .update_category(UpdateCategory {
                id: 42,
                parent_id: None,
                name: "Ghost".to_string(),
                is_active: None,
                view_order: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn move_to_sibling_branch_is_allowed() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(sample_tree().into_iter().find(|c| c.id == id)));
        repo.expect_hierarchy().returning(|| Ok(sample_index()));
        repo.expect_move_to()
            .withf(|change| change.id == 3 && change.parent_id == Some(4))
            .returning(|change| Ok(category(change.id, change.parent_id, "Leaf", 0)));
        let service = CategoryManager::new(Arc::new(repo));

        let moved = service
            .move_category(MoveCategory {
                id: 3,
                parent_id: Some(4),
                position: 0,
            })
            .await
            .unwrap();

        assert_eq!(moved.parent_id, Some(4));
    }

    #[tokio::test]
    async fn delete_maps_flag_to_policy() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_subtree()
            .with(eq(1), eq(DeletePolicy::SoftDeleteProducts))
            .returning(|_, _| {
                Ok(CascadeOutcome {
                    deleted_category_ids: vec![1, 2, 3],
                    affected_products: 1,
                })
            });
        let service = CategoryManager::new(Arc::new(repo));

        let outcome = service.delete_category(1, true).await.unwrap();
        assert_eq!(outcome.deleted_category_ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_rejects_invalid_id() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_subtree().never();
        let service = CategoryManager::new(Arc::new(repo));

        assert!(matches!(
            service.delete_category(0, false).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_all_builds_forest() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all()
            .with(eq(CategoryFilter::default()))
            .returning(|_| Ok(sample_tree()));
        let service = CategoryManager::new(Arc::new(repo));

        let forest = service.list_category(0, "", None).await.unwrap();

        let roots: Vec<i32> = forest.iter().map(|n| n.id).collect();
        assert_eq!(roots, vec![1, 4]);
        assert_eq!(forest[0].children[0].children[0].id, 3);
        assert_eq!(forest[0].expanded, Some(true));
        assert!(forest[1].is_leaf());
    }

    #[tokio::test]
    async fn list_scoped_to_subtree() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_hierarchy().returning(|| Ok(sample_index()));
        repo.expect_list_all().returning(|_| Ok(sample_tree()));
        let service = CategoryManager::new(Arc::new(repo));

        let forest = service.list_category(2, "", None).await.unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 2);
        assert_eq!(forest[0].children[0].id, 3);
    }

    #[tokio::test]
    async fn rows_stay_flat_in_view_order() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_hierarchy().returning(|| Ok(sample_index()));
        repo.expect_list_all().returning(|_| Ok(sample_tree()));
        let service = CategoryManager::new(Arc::new(repo));

        let rows = service.list_category_rows(1, "", None).await.unwrap();

        let ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn list_scoped_to_unknown_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_hierarchy().returning(|| Ok(sample_index()));
        let service = CategoryManager::new(Arc::new(repo));

        assert!(matches!(
            service.list_category(99, "", None).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_surfaces_corrupt_hierarchy() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all().returning(|_| {
            Ok(vec![
                category(1, Some(2), "A", 0),
                category(2, Some(1), "B", 0),
            ])
        });
        let service = CategoryManager::new(Arc::new(repo));

        let result = service.list_category(0, "", None).await;
        assert!(matches!(result, Err(AppError::CycleDetected(1))));
    }
}
