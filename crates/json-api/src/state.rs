//! State

use std::sync::Arc;

use jiff::tz::TimeZone;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use storefront_app::context::AppContext;

#[derive(Debug, Error)]
pub(crate) enum StateError {
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("unknown time zone {name}: {source}")]
    UnknownTimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },
}

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Currency every stored amount is denominated in.
    pub(crate) currency: &'static Currency,

    /// Zone order timestamps are rendered in.
    pub(crate) time_zone: TimeZone,
}

impl State {
    /// Resolve the display settings carried by the app context.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured currency or time zone is unknown.
    pub(crate) fn new(app: AppContext) -> Result<Self, StateError> {
        let currency = iso::find(&app.settings.currency)
            .ok_or_else(|| StateError::UnknownCurrency(app.settings.currency.clone()))?;

        let time_zone = resolve_time_zone(&app.settings.display_time_zone)?;

        Ok(Self {
            app,
            currency,
            time_zone,
        })
    }

    /// # Errors
    ///
    /// See [`State::new`].
    pub(crate) fn from_app_context(app: AppContext) -> Result<Arc<Self>, StateError> {
        Self::new(app).map(Arc::new)
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("app", &self.app)
            .field("currency", &self.currency.iso_alpha_code)
            .field("time_zone", &self.time_zone.iana_name())
            .finish()
    }
}

fn resolve_time_zone(name: &str) -> Result<TimeZone, StateError> {
    if name.eq_ignore_ascii_case("UTC") {
        return Ok(TimeZone::UTC);
    }

    TimeZone::get(name).map_err(|source| StateError::UnknownTimeZone {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use storefront_app::settings::StoreSettings;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_settings_resolve() -> TestResult {
        let state = State::new(AppContext::in_memory(StoreSettings::default()))?;

        assert_eq!(state.currency.iso_alpha_code, "USD");
        assert_eq!(state.time_zone, TimeZone::UTC);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let settings = StoreSettings {
            currency: "XYZ".to_string(),
            ..StoreSettings::default()
        };

        let result = State::new(AppContext::in_memory(settings));

        assert!(
            matches!(result, Err(StateError::UnknownCurrency(ref code)) if code == "XYZ"),
            "expected UnknownCurrency, got {result:?}"
        );
    }
}
