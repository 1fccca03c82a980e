//! Product handlers.

use axum::{
    extract::{rejection::PathRejection, Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{ActionResponse, AppResult};
use domain::{
    AliveFilter, NewProduct, Paginated, PaginationMeta, Product, ProductListOption,
    UpdateProduct, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE,
};

use crate::extractors::ValidatedJson;
use crate::middleware::{require_admin, CurrentUser};
use crate::state::AppState;

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    /// Category to file the product under; 0 or omitted for none
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[schema(example = "Stainless kettle")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "SK-1700")]
    pub model_name: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    #[schema(example = 39000)]
    pub price: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock count cannot be negative"))]
    pub stock_count: i32,
    /// Expose immediately
    #[serde(default)]
    pub exposed: bool,
}

/// Product edit request; every field is replaced
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    /// New category; 0 or omitted leaves the product uncategorized
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[schema(example = "Stainless kettle")]
    pub name: String,
    #[serde(default)]
    pub model_name: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock count cannot be negative"))]
    pub stock_count: i32,
    /// Keep or put the product on the storefront
    #[serde(default)]
    pub exposed: bool,
}

/// Product list query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Name substring
    pub name: Option<String>,
    /// Category; descendants are included
    pub category_id: Option<i32>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size, at most 100
    pub unit: Option<u64>,
}

impl From<ProductListQuery> for ProductListOption {
    fn from(query: ProductListQuery) -> Self {
        Self {
            name: query.name,
            category_id: query.category_id,
            page: query.page.unwrap_or(DEFAULT_PAGE_NUMBER),
            unit: query.unit.unwrap_or(DEFAULT_PAGE_SIZE),
            alive: AliveFilter::Alive,
        }
    }
}

/// Page of products (documentation schema for `Paginated<Product>`)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub meta: PaginationMeta,
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List alive products (admin only)
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(ProductListQuery),
    responses(
        (status = 200, description = "Newest products first", body = ProductPage),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_products(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    require_admin(&current_user)?;
    let page = state.catalog.list_products(query.into()).await?;
    Ok(Json(page))
}

/// Get an exposed, alive product (admin only)
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    require_admin(&current_user)?;
    let product = state.catalog.get_product(id).await?;
    Ok(Json(product))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Json<Product>> {
    require_admin(&current_user)?;

    let product = state
        .catalog
        .create_product(NewProduct {
            category_id: payload.category_id,
            name: payload.name,
            model_name: payload.model_name,
            price: payload.price,
            stock_count: payload.stock_count,
            exposed: payload.exposed,
        })
        .await?;

    info!("Admin {} created product {}", current_user.id, product.id);
    Ok(Json(product))
}

/// Edit a product, including its category (admin only)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error or unknown category"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found or deleted")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    require_admin(&current_user)?;

    let product = state
        .catalog
        .update_product(UpdateProduct {
            id,
            category_id: payload.category_id,
            name: payload.name,
            model_name: payload.model_name,
            price: payload.price,
            stock_count: payload.stock_count,
            exposed: payload.exposed,
        })
        .await?;

    info!(
        "Admin {} updated product {} (category {:?})",
        current_user.id, product.id, product.category_id
    );
    Ok(Json(product))
}

/// Soft delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ActionResponse),
        (status = 400, description = "Product id not numeric", body = ActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found or already deleted", body = ActionResponse)
    )
)]
pub async fn delete_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<ActionResponse> {
    require_admin(&current_user)?;
    let Ok(Path(id)) = path else {
        return Ok(ActionResponse::failure("Product id is not valid"));
    };
    let result = state.catalog.delete_product(id).await;
    Ok(ActionResponse::from_result(result, "Deleted"))
}
