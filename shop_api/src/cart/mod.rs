// shop_api/src/cart/mod.rs

//! Client-side cart bookkeeping.
//!
//! The cart lives entirely on the shopper's side and is independent of the
//! server until checkout, when [`CartStore::order_lines`] becomes the `items`
//! of an order request.

pub mod storage;

use crate::models::{Product, ProductListing};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage};

/// Storage key the cart is kept under.
pub const CART_KEY: &str = "cart";

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum CartError {
  #[error("Cart storage error: {0}")]
  Storage(#[from] std::io::Error),

  #[error("Cart serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
  pub product_id: Uuid,
  pub name: String,
  /// Price when the product was first added.
  pub price: Decimal,
  pub quantity: u32,
}

impl CartEntry {
  pub fn line_total(&self) -> Decimal {
    self.price * Decimal::from(self.quantity)
  }
}

/// The product fields a cart entry snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
}

impl From<&Product> for CartProduct {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      price: product.price,
    }
  }
}

impl From<&ProductListing> for CartProduct {
  fn from(listing: &ProductListing) -> Self {
    Self::from(&listing.product)
  }
}

/// One `items[]` element of an order creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
  pub product_id: Uuid,
  pub quantity: u32,
}

/// Published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CartUpdated {
  pub entries: Vec<CartEntry>,
  pub total: Decimal,
  pub item_count: u32,
}

pub struct CartStore<S: CartStorage> {
  storage: S,
  entries: Mutex<Vec<CartEntry>>,
  event_tx: broadcast::Sender<CartUpdated>,
}

fn total_of(entries: &[CartEntry]) -> Decimal {
  entries.iter().map(CartEntry::line_total).sum()
}

fn item_count_of(entries: &[CartEntry]) -> u32 {
  entries.iter().fold(0u32, |acc, e| acc.saturating_add(e.quantity))
}

impl<S: CartStorage> CartStore<S> {
  /// Loads the saved cart. An unreadable saved value starts an empty cart.
  pub fn open(storage: S) -> Result<Self, CartError> {
    let entries = match storage.load(CART_KEY)? {
      None => Vec::new(),
      Some(raw) => serde_json::from_str::<Vec<CartEntry>>(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Discarding unreadable saved cart.");
        Vec::new()
      }),
    };
    let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    Ok(Self {
      storage,
      entries: Mutex::new(entries),
      event_tx,
    })
  }

  pub fn subscribe(&self) -> broadcast::Receiver<CartUpdated> {
    self.event_tx.subscribe()
  }

  pub fn entries(&self) -> Vec<CartEntry> {
    self.entries.lock().clone()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.lock().is_empty()
  }

  /// Σ price × quantity.
  pub fn total(&self) -> Decimal {
    total_of(&self.entries.lock())
  }

  /// Σ quantity.
  pub fn item_count(&self) -> u32 {
    item_count_of(&self.entries.lock())
  }

  pub fn order_lines(&self) -> Vec<CheckoutLine> {
    self
      .entries
      .lock()
      .iter()
      .map(|e| CheckoutLine {
        product_id: e.product_id,
        quantity: e.quantity,
      })
      .collect()
  }

  /// Applies `change` under the lock, persists, then notifies subscribers.
  fn mutate(&self, change: impl FnOnce(&mut Vec<CartEntry>)) -> Result<(), CartError> {
    let snapshot = {
      let mut entries = self.entries.lock();
      let mut next = entries.clone();
      change(&mut next);
      if next.is_empty() {
        self.storage.remove(CART_KEY)?;
      } else {
        self.storage.save(CART_KEY, &serde_json::to_string(&next)?)?;
      }
      *entries = next;
      entries.clone()
    };

    let event = CartUpdated {
      total: total_of(&snapshot),
      item_count: item_count_of(&snapshot),
      entries: snapshot,
    };
    debug!(items = event.item_count, total = %event.total, "Cart updated.");
    // No subscribers is fine.
    let _ = self.event_tx.send(event);
    Ok(())
  }

  /// Adds `quantity` units, merging into an existing entry. Zero does nothing.
  pub fn add_to_cart(&self, product: &CartProduct, quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
      return Ok(());
    }
    self.mutate(|entries| match entries.iter_mut().find(|e| e.product_id == product.id) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
      None => entries.push(CartEntry {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        quantity,
      }),
    })
  }

  /// Sets the quantity outright; zero or less removes the entry.
  pub fn update_quantity(&self, product_id: Uuid, quantity: i64) -> Result<(), CartError> {
    if quantity <= 0 {
      return self.remove(product_id);
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    self.mutate(|entries| {
      if let Some(existing) = entries.iter_mut().find(|e| e.product_id == product_id) {
        existing.quantity = quantity;
      }
    })
  }

  pub fn remove(&self, product_id: Uuid) -> Result<(), CartError> {
    self.mutate(|entries| entries.retain(|e| e.product_id != product_id))
  }

  pub fn clear(&self) -> Result<(), CartError> {
    self.mutate(Vec::clear)
  }

  /// Empties the cart once the server has accepted the order.
  pub fn complete_checkout(&self) -> Result<(), CartError> {
    self.clear()
  }
}
