//! Order Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{buyers::UserId, carts::models::CartLine, products::models::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Human-facing order reference, `ORD-YYMMDDHHMMSS-NNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Order Model
///
/// Orders never change after creation; items are snapshots taken when the
/// order was placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub code: OrderCode,
    pub user_id: UserId,
    pub subtotal: i64,
    pub total: i64,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A purchased product as it was at order time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// Reference back to the catalog; the snapshot fields below are what the
    /// order shows.
    pub product_uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_uuid: line.product.uuid,
            title: line.product.title.clone(),
            description: line.product.description.clone(),
            image_url: line.product.image_url.clone(),
            price: line.product.price,
            discount: line.product.discount,
            quantity: line.quantity,
        }
    }
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub code: OrderCode,
    pub user_id: UserId,
    pub subtotal: i64,
    pub total: i64,
    pub items: Vec<OrderItem>,
}

/// Order history filter and paging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderQuery {
    /// Case-insensitive match against the order code and item titles and
    /// descriptions.
    pub search: Option<String>,

    /// 1-based page number.
    pub page: u32,

    /// Falls back to the configured default when absent.
    pub page_size: Option<u32>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            page_size: None,
        }
    }
}

impl OrderQuery {
    /// The search term with surrounding whitespace removed, if any is left.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,

    /// Number of matching records across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }

        self.total.div_ceil(u64::from(self.page_size))
    }
}
