//! Product views and payloads.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::models::{NewProduct, Product};

/// Product Response
///
/// Amounts are raw minor units; this is the catalog admin view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,

    /// Unit price in minor currency units
    pub price: i64,

    /// Percentage off the unit price
    pub discount: i32,

    pub stock: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            title: product.title,
            description: product.description,
            image_url: product.image_url,
            price: product.price,
            discount: product.discount,
            stock: product.stock,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Product Request
///
/// Full product payload, used for creation and replacement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub image_url: Option<String>,
    pub price: i64,

    #[serde(default)]
    pub discount: i32,

    pub stock: u32,
}

impl From<ProductRequest> for NewProduct {
    fn from(request: ProductRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            image_url: request.image_url,
            price: request.price,
            discount: request.discount,
            stock: request.stock,
        }
    }
}
