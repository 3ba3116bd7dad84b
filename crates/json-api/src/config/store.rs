//! Store Config

use clap::Args;

use storefront_app::settings::StoreSettings;

/// Storefront behaviour settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 currency code prices are stored in
    #[arg(long, env = "STORE_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// IANA time zone order dates are displayed in
    #[arg(long, env = "STORE_TIME_ZONE", default_value = "UTC")]
    pub display_time_zone: String,

    /// Image URL used for products without an image
    #[arg(
        long,
        env = "STORE_DEFAULT_IMAGE_URL",
        default_value = "/images/placeholder.png"
    )]
    pub default_image_url: String,

    /// Stock level at or below which a cart line is flagged as low stock
    #[arg(long, env = "STORE_LOW_STOCK_THRESHOLD", default_value_t = 5)]
    pub low_stock_threshold: u32,

    /// Default order history page size
    #[arg(long, env = "STORE_PAGE_SIZE", default_value_t = 10)]
    pub page_size: u32,

    /// Largest order history page size a client may request
    #[arg(long, env = "STORE_MAX_PAGE_SIZE", default_value_t = 100)]
    pub max_page_size: u32,

    /// Order code attempts before giving up on collisions
    #[arg(long, env = "STORE_MAX_ORDER_CODE_ATTEMPTS", default_value_t = 1_000)]
    pub max_order_code_attempts: u32,
}

impl From<&StoreConfig> for StoreSettings {
    fn from(config: &StoreConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            display_time_zone: config.display_time_zone.clone(),
            default_image_url: config.default_image_url.clone(),
            low_stock_threshold: config.low_stock_threshold,
            page_size: config.page_size,
            max_page_size: config.max_page_size,
            max_order_code_attempts: config.max_order_code_attempts,
        }
    }
}
