pub mod buyers;
pub mod carts;
pub mod orders;
pub mod products;

/// Coarse classification of service failures, used by transports to pick a
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InvalidState,

    /// Derived totals broke their invariants; indicates a bug or corrupt data.
    ConsistencyViolation,

    Internal,
}
