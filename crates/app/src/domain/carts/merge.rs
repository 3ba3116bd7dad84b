//! Folding an anonymous cart into a user's cart.

use crate::domain::carts::models::Cart;

/// Move every line of `source` into `target`.
///
/// Quantities of products present in both carts are added together. Stock is
/// not checked here; checkout reconciles quantities against live stock.
pub fn merge_into(target: &mut Cart, source: Cart) {
    for line in source.lines {
        match target
            .lines
            .iter_mut()
            .find(|existing| existing.product.uuid == line.product.uuid)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => target.lines.push(line),
        }
    }
}
