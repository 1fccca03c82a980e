//! Category handlers for the admin category grid.

use axum::{
    extract::{rejection::PathRejection, Extension, Path, Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{ActionResponse, AppError, AppResult};
use domain::{Category, CategoryNode, MoveCategory, NewCategory, UpdateCategory, ALL_CATEGORIES};

use crate::extractors::ValidatedJson;
use crate::middleware::{require_admin, CurrentUser};
use crate::state::AppState;

const INVALID_CATEGORY_ID: &str = "Category id is not valid";

/// Category creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    /// Parent category, omitted for a root
    #[schema(example = 1)]
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Kettles")]
    pub name: String,
    pub is_active: Option<bool>,
    /// Sibling position, appended at the end when omitted
    pub view_order: Option<i32>,
}

/// Category update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Electric kettles")]
    pub name: String,
    pub is_active: Option<bool>,
    pub view_order: Option<i32>,
}

/// Drag-and-drop move request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveCategoryRequest {
    /// New parent, omitted to move to the root level
    pub parent_id: Option<i32>,
    /// Zero-based position among the new siblings
    #[validate(range(min = 0, message = "Position cannot be negative"))]
    #[schema(example = 0)]
    pub position: i64,
}

/// Category grid query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoryQuery {
    /// Root of the returned subtree, 0 or omitted for every category
    pub category_id: Option<i32>,
    /// Case-sensitive name substring
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Category delete options
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteCategoryQuery {
    /// Soft delete products of the removed categories instead of detaching them
    #[serde(default)]
    pub delete_related_products: bool,
}

/// Category grid payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    pub message: String,
    pub list: Vec<CategoryNode>,
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
        .route("/:id/move", put(move_category))
}

/// List categories as a forest (admin only)
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(ListCategoryQuery),
    responses(
        (status = 200, description = "Category forest ordered by view order", body = CategoryListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn list_categories(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ListCategoryQuery>,
) -> AppResult<Json<CategoryListResponse>> {
    require_admin(&current_user)?;

    let list = state
        .catalog
        .list_categories(
            query.category_id.unwrap_or(ALL_CATEGORIES),
            query.name.unwrap_or_default(),
            query.is_active,
        )
        .await?;

    Ok(Json(CategoryListResponse {
        message: "retrieved".to_string(),
        list,
    }))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = Category),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Json<Category>> {
    require_admin(&current_user)?;

    let category = state
        .catalog
        .create_category(NewCategory {
            parent_id: payload.parent_id,
            name: payload.name,
            is_active: payload.is_active,
            view_order: payload.view_order,
        })
        .await?;

    info!("Admin {} created category {}", current_user.id, category.id);
    Ok(Json(category))
}

/// Update a category (admin only)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Parent is a descendant of the category")
    )
)]
pub async fn update_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    require_admin(&current_user)?;

    let category = state
        .catalog
        .update_category(UpdateCategory {
            id,
            parent_id: payload.parent_id,
            name: payload.name,
            is_active: payload.is_active,
            view_order: payload.view_order,
        })
        .await?;

    Ok(Json(category))
}

/// Move a category to a new parent and position (admin only)
#[utoipa::path(
    put,
    path = "/categories/{id}/move",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = MoveCategoryRequest,
    responses(
        (status = 200, description = "Category moved", body = ActionResponse),
        (status = 400, description = "Move rejected or id not numeric", body = ActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn move_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<MoveCategoryRequest>,
) -> AppResult<ActionResponse> {
    require_admin(&current_user)?;
    let Ok(Path(id)) = path else {
        return Ok(ActionResponse::failure(INVALID_CATEGORY_ID));
    };

    let result = match usize::try_from(payload.position) {
        Ok(position) => {
            state
                .catalog
                .move_category(MoveCategory {
                    id,
                    parent_id: payload.parent_id,
                    position,
                })
                .await
        }
        Err(_) => Err(AppError::validation("Position cannot be negative")),
    };

    Ok(ActionResponse::from_result(result, "Moved"))
}

/// Delete a category with its whole subtree (admin only)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Category ID"),
        DeleteCategoryQuery
    ),
    responses(
        (status = 200, description = "Subtree deleted", body = ActionResponse),
        (status = 400, description = "Invalid category id", body = ActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found", body = ActionResponse),
        (status = 500, description = "Deletion rolled back", body = ActionResponse)
    )
)]
pub async fn delete_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    Query(query): Query<DeleteCategoryQuery>,
) -> AppResult<ActionResponse> {
    require_admin(&current_user)?;
    let Ok(Path(id)) = path else {
        return Ok(ActionResponse::failure(INVALID_CATEGORY_ID));
    };

    let result = state
        .catalog
        .delete_category(id, query.delete_related_products)
        .await;
    if let Ok(outcome) = &result {
        info!(
            "Admin {} deleted categories {:?} ({} products affected)",
            current_user.id, outcome.deleted_category_ids, outcome.affected_products
        );
    }

    Ok(ActionResponse::from_result(result, "Deleted"))
}
