//! Input validation.
//!
//! Each function checks one kind of input and reports every problem it finds
//! as a [`FieldError`], independent of the transport the input arrived on.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

use smallvec::SmallVec;

use crate::domain::{orders::models::OrderQuery, products::models::NewProduct};

/// Longest accepted buyer identifier.
pub const MAX_BUYER_ID_LEN: usize = 128;

/// Largest quantity a single request may ask for.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,

    /// Human-readable reason.
    pub message: String,
}

/// All field errors found in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 2]>,
}

impl ValidationErrors {
    /// Record an error against `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Field errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;
        }

        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Quantity for adding an item; must be at least one.
///
/// # Errors
///
/// Returns the field errors when the quantity is out of range.
pub fn validate_quantity(quantity: u32) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if quantity == 0 {
        errors.push("quantity", "must be at least 1");
    }

    if quantity > MAX_LINE_QUANTITY {
        errors.push("quantity", format!("must be at most {MAX_LINE_QUANTITY}"));
    }

    errors.into_result()
}

/// Quantity for overwriting a line; zero is allowed and means removal.
///
/// # Errors
///
/// Returns the field errors when the quantity is out of range.
pub fn validate_new_quantity(quantity: u32) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if quantity > MAX_LINE_QUANTITY {
        errors.push("quantity", format!("must be at most {MAX_LINE_QUANTITY}"));
    }

    errors.into_result()
}

/// Opaque buyer token supplied by the client.
///
/// # Errors
///
/// Returns the field errors when the token is blank or too long.
pub fn validate_buyer_id(buyer_id: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if buyer_id.trim().is_empty() {
        errors.push("buyer_id", "must not be blank");
    }

    if buyer_id.len() > MAX_BUYER_ID_LEN {
        errors.push(
            "buyer_id",
            format!("must be at most {MAX_BUYER_ID_LEN} characters"),
        );
    }

    errors.into_result()
}

/// Catalog entry about to be created or overwritten.
///
/// # Errors
///
/// Returns the field errors for every invalid attribute.
pub fn validate_new_product(product: &NewProduct) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if product.title.trim().is_empty() {
        errors.push("title", "must not be blank");
    }

    if product.price < 0 {
        errors.push("price", "must not be negative");
    }

    if !(0..=100).contains(&product.discount) {
        errors.push("discount", "must be between 0 and 100");
    }

    errors.into_result()
}

/// Order history paging and search parameters.
///
/// # Errors
///
/// Returns the field errors when paging is out of range.
pub fn validate_order_query(query: &OrderQuery, max_page_size: u32) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if query.page == 0 {
        errors.push("page", "must be at least 1");
    }

    if let Some(page_size) = query.page_size
        && !(1..=max_page_size).contains(&page_size)
    {
        errors.push(
            "page_size",
            format!("must be between 1 and {max_page_size}"),
        );
    }

    errors.into_result()
}
