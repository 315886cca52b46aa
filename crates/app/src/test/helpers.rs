//! Test Helpers

use crate::domain::{carts::models::Cart, orders::models::OrderLine};

/// Turn a durable cart into the checkout snapshot shape: one line per item,
/// carrying the captured price, plus the precomputed total.
pub(crate) fn order_lines(cart: &Cart) -> (Vec<OrderLine>, u64) {
    let lines: Vec<OrderLine> = cart
        .items
        .iter()
        .map(|item| OrderLine {
            product_uuid: item.product_uuid,
            variant_uuid: item.variant_uuid,
            quantity: item.quantity,
            price: item.price,
        })
        .collect();

    let total = lines.iter().map(OrderLine::subtotal).sum();

    (lines, total)
}
