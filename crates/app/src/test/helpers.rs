//! Test Helpers

use crate::domain::{
    carts::models::LineProduct,
    products::models::{NewProduct, ProductUuid},
};

pub(crate) fn new_product(title: &str, price: i64, discount: i32, stock: u32) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        description: format!("{title} description"),
        image_url: None,
        price,
        discount,
        stock,
    }
}

/// Catalog data for a cart line that is not backed by a stored product.
pub(crate) fn line_product(price: i64, discount: i32, stock: u32) -> LineProduct {
    LineProduct {
        uuid: ProductUuid::new(),
        title: "Test product".to_string(),
        description: String::new(),
        image_url: None,
        price,
        discount,
        stock,
    }
}
