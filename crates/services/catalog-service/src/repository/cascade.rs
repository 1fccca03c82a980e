//! Cascade Deletion Resolver.
//!
//! Resolves a category plus its transitive descendants by walking the
//! `parent_id` index one level per query, then removes the subtree and
//! settles the products that pointed into it. The walk has no depth limit;
//! a visited set turns a corrupt (cyclic) hierarchy into
//! [`AppError::CycleDetected`].
//!
//! Every function takes a generic connection so the same code runs inside
//! a [`UnitOfWork`](crate::infra::UnitOfWork) transaction or on the pool.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect,
};

use common::{AppError, AppResult};
use domain::DeletePolicy;

use super::entities::{category, product};

/// What a subtree deletion touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Root first, then descendants breadth first
    pub deleted_category_ids: Vec<i32>,
    /// Products detached or soft deleted
    pub affected_products: u64,
}

/// `root` followed by every transitive descendant id.
///
/// Fails with `NotFound` when `root` does not exist.
pub async fn resolve_subtree<C>(conn: &C, root: i32) -> AppResult<Vec<i32>>
where
    C: ConnectionTrait,
{
    if category::Entity::find_by_id(root).one(conn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let mut visited = HashSet::from([root]);
    let mut ordered = vec![root];
    let mut frontier = vec![root];
    let mut depth = 0usize;

    while !frontier.is_empty() {
        let children: Vec<i32> = category::Entity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::ParentId.is_in(std::mem::take(&mut frontier)))
            .into_tuple()
            .all(conn)
            .await?;

        for child in children {
            if !visited.insert(child) {
                return Err(AppError::CycleDetected(child));
            }
            ordered.push(child);
            frontier.push(child);
        }
        depth += 1;
    }

    tracing::debug!(
        "Resolved subtree of category {}: {} categories over {} levels",
        root,
        ordered.len(),
        depth
    );

    Ok(ordered)
}

/// Delete `root` and its descendants, applying `policy` to their products.
///
/// Must run inside a transaction: products are settled first, then the
/// categories are removed, and a concurrent change to the subtree between
/// the two steps aborts the whole operation.
pub async fn delete_subtree<C>(conn: &C, root: i32, policy: DeletePolicy) -> AppResult<CascadeOutcome>
where
    C: ConnectionTrait,
{
    let ids = resolve_subtree(conn, root).await?;

    let affected_products = match policy {
        DeletePolicy::DetachProducts => {
            product::Entity::update_many()
                .col_expr(product::Column::CategoryId, Expr::value(Option::<i32>::None))
                .filter(product::Column::CategoryId.is_in(ids.clone()))
                .exec(conn)
                .await?
                .rows_affected
        }
        DeletePolicy::SoftDeleteProducts => {
            product::Entity::update_many()
                .col_expr(product::Column::DeletedAt, Expr::value(Utc::now()))
                .filter(product::Column::CategoryId.is_in(ids.clone()))
                .filter(product::Column::DeletedAt.is_null())
                .exec(conn)
                .await?
                .rows_affected
        }
    };

    let deleted = category::Entity::delete_many()
        .filter(category::Column::Id.is_in(ids.clone()))
        .exec(conn)
        .await?;

    if deleted.rows_affected != ids.len() as u64 {
        return Err(AppError::transaction(format!(
            "expected to delete {} categories under {}, deleted {}",
            ids.len(),
            root,
            deleted.rows_affected
        )));
    }

    Ok(CascadeOutcome {
        deleted_category_ids: ids,
        affected_products,
    })
}
