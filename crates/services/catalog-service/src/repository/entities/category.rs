//! Product category database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Category;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Parent category (NULL = root)
    pub parent_id: Option<i32>,
    pub name: String,
    pub is_active: bool,
    pub view_order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Category {
            id: model.id,
            parent_id: model.parent_id,
            name: model.name,
            is_active: model.is_active,
            view_order: model.view_order,
            created_at: model.created_at,
        }
    }
}
