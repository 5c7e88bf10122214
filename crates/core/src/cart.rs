//! Cart lines and the guest/server reconciliation.
//!
//! A cart is an ordered list of lines, each a product reference, a positive
//! quantity, and the selected option set. Two invariants hold everywhere:
//! at most one line exists per merge key, and a quantity never reaches zero
//! (a decrement past one removes the line instead).
//!
//! Guest mutations key lines by product id alone, so a repeat add of the
//! same product bumps the quantity rather than creating a second line. The
//! login-time merge uses the full key (product id plus the option set in
//! canonical order) so that differently-configured lines survive side by
//! side.

use serde::{Deserialize, Serialize};

use crate::types::catalog::OptionKind;
use crate::types::id::{OptionId, ProductId};

/// One selected product add-on, tagged with its option category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub id: OptionId,
    #[serde(rename = "type")]
    pub kind: OptionKind,
}

/// One entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub options: Vec<SelectedOption>,
}

impl CartLine {
    /// Create a line; quantities below one are clamped to one.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32, options: Vec<SelectedOption>) -> Self {
        Self {
            product_id,
            quantity: quantity.max(1),
            options,
        }
    }

    /// Merge key: the product id plus the option ids in canonical
    /// (ascending) order. Option kinds do not participate; an option id is
    /// already unique across kinds.
    #[must_use]
    pub fn merge_key(&self) -> (ProductId, Vec<OptionId>) {
        let mut ids: Vec<OptionId> = self.options.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        (self.product_id, ids)
    }
}

/// Merge a guest cart into a server cart at login.
///
/// Lines sharing a merge key have their quantities summed; one-sided lines
/// are kept as-is. Server lines come first in server order, then local-only
/// lines in local order, so no key from either side is dropped.
#[must_use]
pub fn merge_carts(server: &[CartLine], local: &[CartLine]) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = server.to_vec();

    for line in local {
        let key = line.merge_key();
        match merged.iter_mut().find(|m| m.merge_key() == key) {
            Some(existing) => existing.quantity += line.quantity,
            None => merged.push(line.clone()),
        }
    }

    merged
}

/// Add a line to a guest cart.
///
/// Matches an existing line by product id only, incrementing its quantity
/// on a repeat add of the same product rather than creating a second line.
pub fn add_line(lines: &mut Vec<CartLine>, line: CartLine) {
    match lines.iter_mut().find(|l| l.product_id == line.product_id) {
        Some(existing) => existing.quantity += line.quantity,
        None => lines.push(line),
    }
}

/// Remove every line for the given product from a guest cart.
pub fn remove_line(lines: &mut Vec<CartLine>, product_id: ProductId) {
    lines.retain(|l| l.product_id != product_id);
}

/// Increment the quantity of the given product's line, if present.
pub fn increment_line(lines: &mut [CartLine], product_id: ProductId) {
    if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
        line.quantity += 1;
    }
}

/// Decrement the quantity of the given product's line.
///
/// A decrement at quantity one removes the line; a zero quantity is never
/// stored.
pub fn decrement_line(lines: &mut Vec<CartLine>, product_id: ProductId) {
    if let Some(pos) = lines.iter().position(|l| l.product_id == product_id) {
        if let Some(line) = lines.get_mut(pos) {
            if line.quantity > 1 {
                line.quantity -= 1;
            } else {
                lines.remove(pos);
            }
        }
    }
}

/// Total number of units across all lines.
#[must_use]
pub fn total_quantity(lines: &[CartLine]) -> u32 {
    lines.iter().map(|l| l.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(id: i64, kind: OptionKind) -> SelectedOption {
        SelectedOption {
            id: OptionId::new(id),
            kind,
        }
    }

    fn line(product: i64, quantity: u32, options: Vec<SelectedOption>) -> CartLine {
        CartLine::new(ProductId::new(product), quantity, options)
    }

    #[test]
    fn test_merge_key_ignores_option_order() {
        let a = line(1, 1, vec![opt(5, OptionKind::Color), opt(2, OptionKind::Extra)]);
        let b = line(1, 1, vec![opt(2, OptionKind::Extra), opt(5, OptionKind::Color)]);
        assert_eq!(a.merge_key(), b.merge_key());
    }

    #[test]
    fn test_merge_sums_shared_keys_and_drops_nothing() {
        let server = vec![
            line(1, 2, vec![opt(3, OptionKind::Color)]),
            line(2, 1, vec![]),
        ];
        let local = vec![
            line(1, 3, vec![opt(3, OptionKind::Color)]),
            line(4, 5, vec![]),
        ];

        let merged = merge_carts(&server, &local);

        assert_eq!(merged.len(), 3);
        let shared = merged
            .iter()
            .find(|l| l.product_id == ProductId::new(1))
            .expect("shared line kept");
        assert_eq!(shared.quantity, 5);
        assert!(merged.iter().any(|l| l.product_id == ProductId::new(2)));
        assert!(merged.iter().any(|l| l.product_id == ProductId::new(4)));
    }

    #[test]
    fn test_merge_distinguishes_option_sets() {
        let server = vec![line(1, 1, vec![opt(3, OptionKind::Color)])];
        let local = vec![line(1, 2, vec![opt(9, OptionKind::Material)])];

        let merged = merge_carts(&server, &local);

        // Same product, different option set: two lines survive.
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_preserves_server_order_first() {
        let server = vec![line(10, 1, vec![]), line(20, 1, vec![])];
        let local = vec![line(30, 1, vec![]), line(20, 2, vec![])];

        let merged = merge_carts(&server, &local);

        let ids: Vec<i64> = merged.iter().map(|l| l.product_id.as_i64()).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_add_increments_existing_product_line() {
        let mut lines = vec![line(7, 2, vec![])];
        add_line(&mut lines, line(7, 1, vec![]));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(3));
    }

    #[test]
    fn test_add_matches_by_product_id_ignoring_options() {
        // Earliest-variant keying: options are ignored when matching adds.
        let mut lines = vec![line(7, 1, vec![opt(1, OptionKind::Color)])];
        add_line(&mut lines, line(7, 1, vec![opt(2, OptionKind::Extra)]));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_decrement_removes_line_at_one() {
        let mut lines = vec![line(1, 1, vec![]), line(2, 4, vec![])];
        decrement_line(&mut lines, ProductId::new(1));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.product_id.as_i64()), Some(2));
        assert_eq!(lines.first().map(|l| l.quantity), Some(4));
    }

    #[test]
    fn test_decrement_subtracts_one_above_one() {
        let mut lines = vec![line(1, 3, vec![])];
        decrement_line(&mut lines, ProductId::new(1));

        assert_eq!(lines.first().map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_remove_clears_product() {
        let mut lines = vec![line(1, 3, vec![]), line(2, 1, vec![])];
        remove_line(&mut lines, ProductId::new(1));

        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_zero_quantity_clamped_on_construction() {
        assert_eq!(line(1, 0, vec![]).quantity, 1);
    }

    #[test]
    fn test_total_quantity() {
        let lines = vec![line(1, 2, vec![]), line(2, 3, vec![])];
        assert_eq!(total_quantity(&lines), 5);
    }

    #[test]
    fn test_selected_option_wire_format() {
        let json = r#"{"id":4,"type":"material"}"#;
        let opt: SelectedOption = serde_json::from_str(json).expect("parse option");
        assert_eq!(opt.kind, OptionKind::Material);
        assert_eq!(
            serde_json::to_string(&opt).expect("serialize option"),
            json
        );
    }
}
