//! Category store tests against in-memory SQLite.

use std::sync::Arc;

use sea_orm::{ConnectOptions, DatabaseConnection};

use catalog_service_lib::infra::Database;
use catalog_service_lib::repository::{
    CategoryRepository, CategoryStore, ProductRepository, ProductStore,
};
use catalog_service_lib::service::{CategoryManager, CategoryService};
use common::AppError;
use domain::{
    Category, CategoryFilter, DeletePolicy, MoveCategory, NewCategory, NewProduct, UpdateCategory,
};

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let connection = sea_orm::Database::connect(options).await.unwrap();
    Database::from_connection(connection.clone())
        .run_migrations()
        .await
        .unwrap();
    connection
}

async fn create(store: &CategoryStore, parent_id: Option<i32>, name: &str) -> Category {
    store
        .create(NewCategory {
            parent_id,
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}

/// Categories {1: root, 2: parent=1, 3: parent=2}
async fn chain(store: &CategoryStore) -> (Category, Category, Category) {
    let root = create(store, None, "Root").await;
    let parent = create(store, Some(root.id), "Parent").await;
    let leaf = create(store, Some(parent.id), "Leaf").await;
    (root, parent, leaf)
}

async fn product_in(products: &ProductStore, category_id: i32) -> i32 {
    products
        .create(NewProduct {
            category_id: Some(category_id),
            name: "Kettle".to_string(),
            price: 1200,
            exposed: true,
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn delete_detaches_products_of_whole_subtree() {
    let db = setup().await;
    let store = CategoryStore::new(db.clone());
    let products = ProductStore::new(db);

    let (root, parent, leaf) = chain(&store).await;
    let product_id = product_in(&products, leaf.id).await;

    let outcome = store
        .delete_subtree(root.id, DeletePolicy::DetachProducts)
        .await
        .unwrap();

    let mut deleted = outcome.deleted_category_ids.clone();
    deleted.sort();
    assert_eq!(deleted, vec![root.id, parent.id, leaf.id]);
    assert_eq!(outcome.affected_products, 1);
    assert!(store.list_all(CategoryFilter::default()).await.unwrap().is_empty());

    let product = products.find_by_id(product_id, true).await.unwrap().unwrap();
    assert_eq!(product.category_id, None);
    assert!(product.deleted_at.is_none());
}

#[tokio::test]
async fn delete_with_related_products_soft_deletes_them() {
    let db = setup().await;
    let store = CategoryStore::new(db.clone());
    let products = ProductStore::new(db);

    let (root, _, leaf) = chain(&store).await;
    let product_id = product_in(&products, leaf.id).await;

    store
        .delete_subtree(root.id, DeletePolicy::SoftDeleteProducts)
        .await
        .unwrap();

    assert!(store.list_all(CategoryFilter::default()).await.unwrap().is_empty());
    let product = products.find_by_id(product_id, true).await.unwrap().unwrap();
    assert!(product.deleted_at.is_some());
    assert!(products.find_by_id(product_id, false).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_leaves_sibling_trees_alone() {
    let db = setup().await;
    let store = CategoryStore::new(db.clone());
    let products = ProductStore::new(db);

    let (_, parent, _) = chain(&store).await;
    let other = create(&store, None, "Other").await;
    let other_child = create(&store, Some(other.id), "Other child").await;
    let product_id = product_in(&products, other_child.id).await;

    store
        .delete_subtree(parent.id, DeletePolicy::SoftDeleteProducts)
        .await
        .unwrap();

    let remaining: Vec<i32> = store
        .list_all(CategoryFilter::default())
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(remaining.len(), 3);
    assert!(!remaining.contains(&parent.id));
    // No survivor points at a deleted id
    for category in store.list_all(CategoryFilter::default()).await.unwrap() {
        if let Some(parent_id) = category.parent_id {
            assert!(remaining.contains(&parent_id));
        }
    }

    let product = products.find_by_id(product_id, true).await.unwrap().unwrap();
    assert_eq!(product.category_id, Some(other_child.id));
    assert!(product.deleted_at.is_none());
}

#[tokio::test]
async fn delete_of_unknown_category_changes_nothing() {
    let db = setup().await;
    let store = CategoryStore::new(db);
    chain(&store).await;

    let result = store.delete_subtree(999, DeletePolicy::DetachProducts).await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(store.list_all(CategoryFilter::default()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn corrupt_cycle_rolls_back_delete() {
    let db = setup().await;
    let store = CategoryStore::new(db);
    let root = create(&store, None, "A").await;
    let child = create(&store, Some(root.id), "B").await;

    // The store does not guard cycles, the service does
    store
        .update(UpdateCategory {
            id: root.id,
            parent_id: Some(child.id),
            name: "A".to_string(),
            is_active: None,
            view_order: None,
        })
        .await
        .unwrap();

    let result = store.delete_subtree(root.id, DeletePolicy::DetachProducts).await;

    assert!(matches!(result, Err(AppError::CycleDetected(_))));
    assert_eq!(store.list_all(CategoryFilter::default()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn descendants_of_deep_chain_are_all_resolved() {
    let db = setup().await;
    let store = CategoryStore::new(db);

    let root = create(&store, None, "Level 0").await;
    let mut parent = root.id;
    for level in 1..40 {
        parent = create(&store, Some(parent), &format!("Level {}", level)).await.id;
    }

    let ids = store.descendant_ids(root.id).await.unwrap();
    assert_eq!(ids.len(), 40);
    assert_eq!(ids[0], root.id);
    assert_eq!(*ids.last().unwrap(), parent);
}

#[tokio::test]
async fn create_trims_name_and_appends_view_order() {
    let db = setup().await;
    let store = CategoryStore::new(db);
    let root = create(&store, None, "  Root  ").await;
    let first = create(&store, Some(root.id), "First").await;
    let second = create(&store, Some(root.id), "Second").await;

    assert_eq!(root.name, "Root");
    assert!(root.is_active);
    assert_eq!(first.view_order, 0);
    assert_eq!(second.view_order, 1);

    let blank = store
        .create(NewCategory {
            name: " ".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(blank, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_of_unknown_category_is_not_found() {
    let db = setup().await;
    let store = CategoryStore::new(db);

    let result = store
        .update(UpdateCategory {
            id: 77,
            parent_id: None,
            name: "Ghost".to_string(),
            is_active: Some(false),
            view_order: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn list_filters_intersect_and_match_case() {
    let db = setup().await;
    let store = CategoryStore::new(db);
    create(&store, None, "xabcx").await;
    create(&store, None, "ABC").await;
    store
        .create(NewCategory {
            name: "abc hidden".to_string(),
            is_active: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let by_name = store
        .list_all(CategoryFilter::new("abc", None))
        .await
        .unwrap();
    assert_eq!(by_name.len(), 2);
    assert!(by_name.iter().all(|c| c.name.contains("abc")));

    let active = store
        .list_all(CategoryFilter::new("", Some(true)))
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|c| c.is_active));

    let both = store
        .list_all(CategoryFilter::new("abc", Some(true)))
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].name, "xabcx");
}

#[tokio::test]
async fn move_inserts_at_position_and_renumbers() {
    let db = setup().await;
    let store = CategoryStore::new(db);
    let root = create(&store, None, "Root").await;
    let a = create(&store, Some(root.id), "A").await;
    let b = create(&store, Some(root.id), "B").await;
    let other = create(&store, None, "Other").await;
    let c = create(&store, Some(other.id), "C").await;

    let moved = store
        .move_to(MoveCategory {
            id: c.id,
            parent_id: Some(root.id),
            position: 1,
        })
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(root.id));
    assert_eq!(moved.view_order, 1);

    let children: Vec<(i32, i32)> = store
        .list_all(CategoryFilter::default())
        .await
        .unwrap()
        .into_iter()
        .filter(|cat| cat.parent_id == Some(root.id))
        .map(|cat| (cat.id, cat.view_order))
        .collect();
    assert_eq!(children, vec![(a.id, 0), (c.id, 1), (b.id, 2)]);

    // Position past the end appends
    let moved = store
        .move_to(MoveCategory {
            id: a.id,
            parent_id: Some(root.id),
            position: 99,
        })
        .await
        .unwrap();
    assert_eq!(moved.view_order, 2);
}

#[tokio::test]
async fn service_lists_full_forest_in_view_order() {
    let db = setup().await;
    let store = Arc::new(CategoryStore::new(db));
    let service = CategoryManager::new(store.clone());

    let second_root = create(&store, None, "Second").await;
    let first_root = store
        .create(NewCategory {
            name: "First".to_string(),
            view_order: Some(-1),
            ..Default::default()
        })
        .await
        .unwrap();
    let child = create(&store, Some(second_root.id), "Child").await;

    let forest = service.list_category(0, "", None).await.unwrap();

    let roots: Vec<i32> = forest.iter().map(|n| n.id).collect();
    assert_eq!(roots, vec![first_root.id, second_root.id]);
    assert!(forest[0].is_leaf());
    assert_eq!(forest[1].children[0].id, child.id);
    assert_eq!(forest[1].expanded, Some(true));
}

#[tokio::test]
async fn service_rejects_move_under_descendant() {
    let db = setup().await;
    let store = Arc::new(CategoryStore::new(db));
    let service = CategoryManager::new(store.clone());
    let (root, _, leaf) = chain(&store).await;

    let result = service
        .move_category(MoveCategory {
            id: root.id,
            parent_id: Some(leaf.id),
            position: 0,
        })
        .await;

    assert!(matches!(result, Err(AppError::CycleDetected(_))));
    let unchanged = store.find_by_id(root.id).await.unwrap().unwrap();
    assert_eq!(unchanged.parent_id, None);
}
