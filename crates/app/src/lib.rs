//! Storefront domain, pricing and persistence modules.

pub mod context;
pub mod database;
pub mod domain;
pub mod settings;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
