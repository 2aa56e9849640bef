// shop_api/src/lib.rs

//! Wow Shoppers Lite: a small storefront API.
//!
//! Categories and products are read through the catalog query builder,
//! orders are placed through a `wow-workflow` pipeline, and every query goes
//! through an injected [`store::ShopStore`]. The [`cart`] module models the
//! shopper's local cart.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
pub mod web;
