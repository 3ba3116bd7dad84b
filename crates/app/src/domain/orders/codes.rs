//! Order code generation.
//!
//! Codes combine the UTC creation second with a three digit suffix, so at most
//! 900 distinct codes exist per second. Uniqueness is checked against storage
//! by the caller.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::Timestamp;
use rand::Rng;

use crate::domain::orders::models::OrderCode;

/// Smallest suffix a code may carry.
pub const MIN_SUFFIX: u16 = 100;

/// Largest suffix a code may carry.
pub const MAX_SUFFIX: u16 = 999;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// Source of code suffixes in `MIN_SUFFIX..=MAX_SUFFIX`.
pub type SuffixSource = Arc<dyn Fn() -> u16 + Send + Sync>;

/// Produces candidate order codes.
#[derive(Clone)]
pub struct OrderCodeGenerator {
    clock: Clock,
    suffixes: SuffixSource,
}

impl OrderCodeGenerator {
    #[must_use]
    pub fn new(clock: Clock, suffixes: SuffixSource) -> Self {
        Self { clock, suffixes }
    }

    /// The next candidate; may collide with an existing code.
    #[must_use]
    pub fn next_code(&self) -> OrderCode {
        let suffix = (self.suffixes)().clamp(MIN_SUFFIX, MAX_SUFFIX);

        format_code((self.clock)(), suffix)
    }
}

impl Default for OrderCodeGenerator {
    fn default() -> Self {
        Self::new(
            Arc::new(Timestamp::now),
            Arc::new(|| rand::thread_rng().gen_range(MIN_SUFFIX..=MAX_SUFFIX)),
        )
    }
}

impl Debug for OrderCodeGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrderCodeGenerator").finish_non_exhaustive()
    }
}

/// Render `ORD-YYMMDDHHMMSS-NNN` for `at` in UTC.
#[must_use]
pub fn format_code(at: Timestamp, suffix: u16) -> OrderCode {
    OrderCode::new(format!("ORD-{}-{suffix:03}", at.strftime("%y%m%d%H%M%S")))
}
