//! Cart endpoints.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod views;

pub(crate) use handlers::*;
