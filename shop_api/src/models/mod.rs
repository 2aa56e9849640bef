// shop_api/src/models/mod.rs

//! Data structures representing database entities and their API shapes.

pub mod category;
pub mod order;
pub mod order_item;
pub mod product;

pub use category::Category;
pub use order::{
  DeliveryMethod, Order, OrderDetail, OrderReceipt, OrderStatus, OrderSummary, PaymentMethod, PlacedOrder, StatusUpdate,
  MAX_ORDER_AMOUNT,
};
pub use order_item::{OrderItem, OrderLine};
pub use product::{Product, ProductListing};
