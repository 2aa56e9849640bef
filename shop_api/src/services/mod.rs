// shop_api/src/services/mod.rs

//! Request-level operations shared by the HTTP handlers and the tests.

pub mod catalog_service;
pub mod order_service;
