//! Product Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,

    /// Unit price in minor currency units.
    pub price: i64,

    /// Percentage taken off the unit price.
    pub discount: i32,

    pub stock: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
///
/// Also used as the full replacement payload when updating.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub stock: u32,
}
