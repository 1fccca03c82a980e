//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::category_handler::{
    CategoryListResponse, CreateCategoryRequest, MoveCategoryRequest, UpdateCategoryRequest,
};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::product_handler::{CreateProductRequest, ProductPage, UpdateProductRequest};
use common::ActionResponse;
use domain::{Category, CategoryNode, PaginationMeta, Product};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::category_handler::list_categories,
        crate::handlers::category_handler::create_category,
        crate::handlers::category_handler::update_category,
        crate::handlers::category_handler::move_category,
        crate::handlers::category_handler::delete_category,
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::create_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::delete_product,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
            Category,
            CategoryNode,
            CategoryListResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            MoveCategoryRequest,
            Product,
            ProductPage,
            PaginationMeta,
            CreateProductRequest,
            UpdateProductRequest,
            ActionResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Dependency health"),
        (name = "Categories", description = "Category tree management"),
        (name = "Products", description = "Product management"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
