//! gRPC client for catalog-service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::{
    build_forest, AliveFilter, Category, CategoryNode, MoveCategory, NewCategory, NewProduct,
    Paginated, Product, ProductListOption, UpdateCategory, UpdateProduct,
};
use proto::catalog::{
    self as pb, catalog_service_client::CatalogServiceClient as ProtoCatalogServiceClient,
    CreateCategoryRequest, CreateProductRequest, DeleteCategoryRequest, DeleteProductRequest,
    GetProductRequest, HealthRequest, ListCategoriesRequest, ListProductsRequest,
    MoveCategoryRequest, UpdateCategoryRequest, UpdateProductRequest,
};

use super::{CatalogApi, DeletedSubtree};

/// gRPC client wrapper for catalog-service.
pub struct CatalogClient {
    client: ProtoCatalogServiceClient<Channel>,
}

impl CatalogClient {
    /// Connect to catalog-service.
    pub async fn connect(config: &GrpcClientConfig) -> Result<Self, tonic::transport::Error> {
        debug!("Connecting to catalog-service at {}", config.endpoint);
        let channel = Endpoint::from_shared(config.endpoint.clone())?
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect()
            .await?;
        Ok(Self {
            client: ProtoCatalogServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn health(&self) -> AppResult<bool> {
        let mut client = self.client.clone();
        let response = client
            .health(tonic::Request::new(HealthRequest {}))
            .await
            .map_err(AppError::from)?;
        Ok(response.into_inner().database)
    }

    async fn list_categories(
        &self,
        category_id: i32,
        name: String,
        is_active: Option<bool>,
    ) -> AppResult<Vec<CategoryNode>> {
        let request = tonic::Request::new(ListCategoriesRequest {
            category_id,
            name,
            is_active,
        });

        let mut client = self.client.clone();
        let response = client
            .list_categories(request)
            .await
            .map_err(AppError::from)?;

        let rows = response
            .into_inner()
            .categories
            .into_iter()
            .map(proto_to_category)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(build_forest(&rows)?)
    }

    async fn create_category(&self, new: NewCategory) -> AppResult<Category> {
        let request = tonic::Request::new(CreateCategoryRequest {
            parent_id: new.parent_id,
            name: new.name,
            is_active: new.is_active,
            view_order: new.view_order,
        });

        let mut client = self.client.clone();
        let response = client
            .create_category(request)
            .await
            .map_err(AppError::from)?;
        category_from_response(response.into_inner().category)
    }

    async fn update_category(&self, change: UpdateCategory) -> AppResult<Category> {
        let request = tonic::Request::new(UpdateCategoryRequest {
            id: change.id,
            parent_id: change.parent_id,
            name: change.name,
            is_active: change.is_active,
            view_order: change.view_order,
        });

        let mut client = self.client.clone();
        let response = client
            .update_category(request)
            .await
            .map_err(AppError::from)?;
        category_from_response(response.into_inner().category)
    }

    async fn move_category(&self, change: MoveCategory) -> AppResult<Category> {
        let position = u32::try_from(change.position)
            .map_err(|_| AppError::validation("Position is out of range"))?;
        let request = tonic::Request::new(MoveCategoryRequest {
            id: change.id,
            parent_id: change.parent_id,
            position,
        });

        let mut client = self.client.clone();
        let response = client
            .move_category(request)
            .await
            .map_err(AppError::from)?;
        category_from_response(response.into_inner().category)
    }

    async fn delete_category(
        &self,
        category_id: i32,
        delete_related_products: bool,
    ) -> AppResult<DeletedSubtree> {
        let request = tonic::Request::new(DeleteCategoryRequest {
            category_id,
            delete_related_products,
        });

        let mut client = self.client.clone();
        let response = client
            .delete_category(request)
            .await
            .map_err(AppError::from)?
            .into_inner();

        Ok(DeletedSubtree {
            deleted_category_ids: response.deleted_category_ids,
            affected_products: response.affected_products,
        })
    }

    async fn create_product(&self, new: NewProduct) -> AppResult<Product> {
        let request = tonic::Request::new(CreateProductRequest {
            category_id: new.category_id,
            name: new.name,
            model_name: new.model_name,
            price: new.price,
            stock_count: new.stock_count,
            exposed: new.exposed,
        });

        let mut client = self.client.clone();
        let response = client
            .create_product(request)
            .await
            .map_err(AppError::from)?;
        product_from_response(response.into_inner().product)
    }

    async fn update_product(&self, change: UpdateProduct) -> AppResult<Product> {
        let request = tonic::Request::new(UpdateProductRequest {
            id: change.id,
            category_id: change.category_id,
            name: change.name,
            model_name: change.model_name,
            price: change.price,
            stock_count: change.stock_count,
            exposed: change.exposed,
        });

        let mut client = self.client.clone();
        let response = client
            .update_product(request)
            .await
            .map_err(AppError::from)?;
        product_from_response(response.into_inner().product)
    }

    async fn get_product(&self, id: i32) -> AppResult<Product> {
        let request = tonic::Request::new(GetProductRequest {
            id,
            allow_deleted: false,
        });

        let mut client = self.client.clone();
        let response = client.get_product(request).await.map_err(AppError::from)?;
        product_from_response(response.into_inner().product)
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        let request = tonic::Request::new(DeleteProductRequest { id });

        let mut client = self.client.clone();
        client.delete_product(request).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn list_products(&self, option: ProductListOption) -> AppResult<Paginated<Product>> {
        let alive = match option.alive {
            AliveFilter::Alive => pb::AliveFilter::Alive,
            AliveFilter::Deleted => pb::AliveFilter::Deleted,
            AliveFilter::All => pb::AliveFilter::All,
        };
        let request = tonic::Request::new(ListProductsRequest {
            name: option.name.unwrap_or_default(),
            category_id: option.category_id,
            page: option.page,
            unit: option.unit,
            alive: alive.into(),
        });

        let mut client = self.client.clone();
        let response = client
            .list_products(request)
            .await
            .map_err(AppError::from)?
            .into_inner();

        let products = response
            .products
            .into_iter()
            .map(proto_to_product)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Paginated::new(
            products,
            response.page,
            response.unit,
            response.total,
        ))
    }
}

fn parse_timestamp(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::internal(format!("Invalid {} from catalog-service", field)))
}

/// Convert proto Category to domain Category.
fn proto_to_category(proto: pb::Category) -> AppResult<Category> {
    Ok(Category {
        id: proto.id,
        parent_id: proto.parent_id,
        created_at: parse_timestamp(&proto.created_at, "created_at")?,
        name: proto.name,
        is_active: proto.is_active,
        view_order: proto.view_order,
    })
}

fn category_from_response(category: Option<pb::Category>) -> AppResult<Category> {
    category
        .ok_or_else(|| AppError::internal("Empty category response from catalog-service"))
        .and_then(proto_to_category)
}

/// Convert proto Product to domain Product.
fn proto_to_product(proto: pb::Product) -> AppResult<Product> {
    let exposed_at = proto
        .exposed_at
        .as_deref()
        .map(|dt| parse_timestamp(dt, "exposed_at"))
        .transpose()?;
    let deleted_at = proto
        .deleted_at
        .as_deref()
        .map(|dt| parse_timestamp(dt, "deleted_at"))
        .transpose()?;

    Ok(Product {
        id: proto.id,
        category_id: proto.category_id,
        created_at: parse_timestamp(&proto.created_at, "created_at")?,
        name: proto.name,
        model_name: proto.model_name,
        price: proto.price,
        stock_count: proto.stock_count,
        exposed_at,
        deleted_at,
    })
}

fn product_from_response(product: Option<pb::Product>) -> AppResult<Product> {
    product
        .ok_or_else(|| AppError::internal("Empty product response from catalog-service"))
        .and_then(proto_to_product)
}
