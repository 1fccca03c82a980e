//! HTTP request handlers.

pub mod category_handler;
pub mod health_handler;
pub mod product_handler;

pub use category_handler::category_routes;
pub use health_handler::health_routes;
pub use product_handler::product_routes;
