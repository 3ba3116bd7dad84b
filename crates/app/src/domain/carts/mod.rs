//! Carts

pub mod errors;
pub mod merge;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
