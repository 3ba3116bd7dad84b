//! Store Settings

/// Immutable settings shared by the services and the presentation layer.
///
/// Built once at startup and handed to every constructor that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// ISO 4217 code used when formatting minor-unit amounts.
    pub currency: String,

    /// IANA time zone order timestamps are displayed in.
    pub display_time_zone: String,

    /// Image shown for products without one.
    pub default_image_url: String,

    /// Stock level at or below which a cart line is flagged as running low.
    pub low_stock_threshold: u32,

    /// Default number of orders per history page.
    pub page_size: u32,

    /// Largest page size a caller may request.
    pub max_page_size: u32,

    /// How many order codes to try before giving up on a collision streak.
    pub max_order_code_attempts: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            display_time_zone: "UTC".to_string(),
            default_image_url: "/images/placeholder.png".to_string(),
            low_stock_threshold: 5,
            page_size: 10,
            max_page_size: 100,
            max_order_code_attempts: 1_000,
        }
    }
}
