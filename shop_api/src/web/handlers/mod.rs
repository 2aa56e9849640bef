// shop_api/src/web/handlers/mod.rs

pub mod catalog_handlers;
pub mod order_handlers;
