//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Product;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub model_name: String,
    pub price: i64,
    pub stock_count: i32,
    pub exposed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = alive, set = deleted)
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            model_name: model.model_name,
            price: model.price,
            stock_count: model.stock_count,
            exposed_at: model.exposed_at,
            created_at: model.created_at,
            deleted_at: model.deleted_at,
        }
    }
}
