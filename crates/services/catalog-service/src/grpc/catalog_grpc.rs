//! gRPC implementation for CatalogService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::infra::Database;
use crate::service::{CategoryService, ProductService};
use domain::{
    AliveFilter, MoveCategory, NewCategory, NewProduct, ProductListOption, UpdateCategory,
    UpdateProduct,
};
use proto::catalog::{
    self as pb, catalog_service_server::CatalogService as CatalogServiceProto,
    CategoryResponse, CreateCategoryRequest, CreateProductRequest, DeleteCategoryRequest,
    DeleteCategoryResponse, DeleteProductRequest, DeleteProductResponse, GetProductRequest,
    HealthRequest, HealthResponse, ListCategoriesRequest, ListCategoriesResponse,
    ListProductsRequest, ListProductsResponse, MoveCategoryRequest, ProductResponse,
    UpdateCategoryRequest, UpdateProductRequest,
};

/// gRPC service wrapper for the category and product services.
pub struct CatalogGrpcService {
    categories: Arc<dyn CategoryService>,
    products: Arc<dyn ProductService>,
    db: Database,
}

impl CatalogGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(
        categories: Arc<dyn CategoryService>,
        products: Arc<dyn ProductService>,
        db: Database,
    ) -> Self {
        Self {
            categories,
            products,
            db,
        }
    }
}

#[tonic::async_trait]
impl CatalogServiceProto for CatalogGrpcService {
    async fn health(
        &self,
        _request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        let database = match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        };
        Ok(Response::new(HealthResponse { database }))
    }

    async fn create_category(
        &self,
        request: Request<CreateCategoryRequest>,
    ) -> Result<Response<CategoryResponse>, Status> {
        let req = request.into_inner();
        let new = NewCategory {
            parent_id: req.parent_id,
            name: req.name,
            is_active: req.is_active,
            view_order: req.view_order,
        };

        let category = self
            .categories
            .create_category(new)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(category_response(&category)))
    }

    async fn update_category(
        &self,
        request: Request<UpdateCategoryRequest>,
    ) -> Result<Response<CategoryResponse>, Status> {
        let req = request.into_inner();
        let change = UpdateCategory {
            id: req.id,
            parent_id: req.parent_id,
            name: req.name,
            is_active: req.is_active,
            view_order: req.view_order,
        };

        let category = self
            .categories
            .update_category(change)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(category_response(&category)))
    }

    async fn move_category(
        &self,
        request: Request<MoveCategoryRequest>,
    ) -> Result<Response<CategoryResponse>, Status> {
        let req = request.into_inner();
        let change = MoveCategory {
            id: req.id,
            parent_id: req.parent_id,
            position: req.position as usize,
        };

        let category = self
            .categories
            .move_category(change)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(category_response(&category)))
    }

    async fn delete_category(
        &self,
        request: Request<DeleteCategoryRequest>,
    ) -> Result<Response<DeleteCategoryResponse>, Status> {
        let req = request.into_inner();

        let outcome = self
            .categories
            .delete_category(req.category_id, req.delete_related_products)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteCategoryResponse {
            deleted_category_ids: outcome.deleted_category_ids,
            affected_products: outcome.affected_products,
        }))
    }

    async fn list_categories(
        &self,
        request: Request<ListCategoriesRequest>,
    ) -> Result<Response<ListCategoriesResponse>, Status> {
        let req = request.into_inner();

        let rows = self
            .categories
            .list_category_rows(req.category_id, &req.name, req.is_active)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ListCategoriesResponse {
            categories: rows.iter().map(category_to_proto).collect(),
        }))
    }

    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let new = NewProduct {
            category_id: req.category_id,
            name: req.name,
            model_name: req.model_name,
            price: req.price,
            stock_count: req.stock_count,
            exposed: req.exposed,
        };

        let product = self
            .products
            .create_product(new)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ProductResponse {
            product: Some(product_to_proto(&product)),
        }))
    }

    async fn update_product(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let change = UpdateProduct {
            id: req.id,
            category_id: req.category_id,
            name: req.name,
            model_name: req.model_name,
            price: req.price,
            stock_count: req.stock_count,
            exposed: req.exposed,
        };

        let product = self
            .products
            .update_product(change)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ProductResponse {
            product: Some(product_to_proto(&product)),
        }))
    }

    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();

        let product = self
            .products
            .get_product(req.id, req.allow_deleted)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ProductResponse {
            product: Some(product_to_proto(&product)),
        }))
    }

    async fn delete_product(
        &self,
        request: Request<DeleteProductRequest>,
    ) -> Result<Response<DeleteProductResponse>, Status> {
        let req = request.into_inner();

        self.products
            .delete_product(req.id)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteProductResponse { success: true }))
    }

    async fn list_products(
        &self,
        request: Request<ListProductsRequest>,
    ) -> Result<Response<ListProductsResponse>, Status> {
        let req = request.into_inner();
        let alive = match req.alive() {
            pb::AliveFilter::Alive => AliveFilter::Alive,
            pb::AliveFilter::Deleted => AliveFilter::Deleted,
            pb::AliveFilter::All => AliveFilter::All,
        };
        let option = ProductListOption {
            name: Some(req.name),
            category_id: req.category_id,
            page: req.page,
            unit: req.unit,
            alive,
        };

        let page = self
            .products
            .list_products(option)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ListProductsResponse {
            products: page.data.iter().map(product_to_proto).collect(),
            total: page.meta.total,
            page: page.meta.page,
            unit: page.meta.per_page,
        }))
    }
}

/// Convert domain Category to proto Category.
fn category_to_proto(category: &domain::Category) -> pb::Category {
    pb::Category {
        id: category.id,
        parent_id: category.parent_id,
        name: category.name.clone(),
        is_active: category.is_active,
        view_order: category.view_order,
        created_at: category.created_at.to_rfc3339(),
    }
}

fn category_response(category: &domain::Category) -> CategoryResponse {
    CategoryResponse {
        category: Some(category_to_proto(category)),
    }
}

/// Convert domain Product to proto Product.
fn product_to_proto(product: &domain::Product) -> pb::Product {
    pb::Product {
        id: product.id,
        category_id: product.category_id,
        name: product.name.clone(),
        model_name: product.model_name.clone(),
        price: product.price,
        stock_count: product.stock_count,
        exposed_at: product.exposed_at.map(|dt| dt.to_rfc3339()),
        created_at: product.created_at.to_rfc3339(),
        deleted_at: product.deleted_at.map(|dt| dt.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn category_conversion_keeps_parent_and_flags() {
        let category = domain::Category {
            id: 2,
            parent_id: Some(1),
            name: "Leaf".to_string(),
            is_active: false,
            view_order: 3,
            created_at: Utc::now(),
        };

        let proto = category_to_proto(&category);
        assert_eq!(proto.id, 2);
        assert_eq!(proto.parent_id, Some(1));
        assert!(!proto.is_active);
        assert_eq!(proto.view_order, 3);
        assert_eq!(proto.created_at, category.created_at.to_rfc3339());
    }
}
