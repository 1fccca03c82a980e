//! SeaORM entities.

pub mod category;
pub mod product;
