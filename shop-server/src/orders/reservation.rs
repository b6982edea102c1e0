//! Stock Reservation
//!
//! The pure availability policy, evaluated per line in request order
//! against the stock seen by the transaction:
//!
//! | condition              | action                         |
//! |------------------------|--------------------------------|
//! | variant not found      | skip (`skipped:missing`)       |
//! | stock == 0             | skip (`skipped:out_of_stock`)  |
//! | stock >= requested     | accept as requested (`full`)   |
//! | 0 < stock < requested  | clamp to stock (`clamped`)     |
//!
//! Duplicate variant ids observe the stock left by earlier lines, so a
//! clamp may cascade to an out-of-stock skip later in the same request.

use std::collections::BTreeMap;

use shared::models::{Fulfillment, OrderLineRequest, SkippedLineView};

use super::catalog::VariantSnapshot;

/// A line accepted by the policy, carrying its snapshot
#[derive(Debug, Clone)]
pub struct AcceptedLine {
    pub product_instance_id: i64,
    pub product_name: String,
    pub price: i64,
    pub quantity: i64,
    pub fulfillment: Fulfillment,
}

/// One pending stock write, guarded by the version read in this transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    pub product_instance_id: i64,
    pub new_stock: i64,
    pub expected_version: i64,
}

/// Outcome of the policy over a whole request
#[derive(Debug, Default)]
pub struct Reservation {
    pub accepted: Vec<AcceptedLine>,
    pub skipped: Vec<SkippedLineView>,
    /// One entry per touched variant, ascending by id
    pub stock_updates: Vec<StockUpdate>,
}

/// Apply the policy to the requested lines
pub fn reserve(
    lines: &[OrderLineRequest],
    variants: &BTreeMap<i64, VariantSnapshot>,
) -> Reservation {
    let mut remaining: BTreeMap<i64, i64> =
        variants.iter().map(|(id, v)| (*id, v.stock)).collect();
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();

    for line in lines {
        let Some(variant) = variants.get(&line.product_instance_id) else {
            skipped.push(SkippedLineView {
                product_instance_id: line.product_instance_id,
                requested: line.quantity,
                fulfillment: Fulfillment::SkippedMissing,
            });
            continue;
        };
        let Some(available) = remaining.get_mut(&variant.id) else {
            continue;
        };
        if *available == 0 {
            skipped.push(SkippedLineView {
                product_instance_id: line.product_instance_id,
                requested: line.quantity,
                fulfillment: Fulfillment::SkippedOutOfStock,
            });
            continue;
        }

        let (quantity, fulfillment) = if *available >= line.quantity {
            (line.quantity, Fulfillment::Full)
        } else {
            (*available, Fulfillment::Clamped)
        };
        *available -= quantity;

        accepted.push(AcceptedLine {
            product_instance_id: variant.id,
            product_name: variant.product_name.clone(),
            price: variant.price,
            quantity,
            fulfillment,
        });
    }

    // BTreeMap iteration keeps updates ascending by variant id
    let stock_updates = variants
        .values()
        .filter_map(|variant| {
            let left = *remaining.get(&variant.id).unwrap_or(&variant.stock);
            (left != variant.stock).then_some(StockUpdate {
                product_instance_id: variant.id,
                new_stock: left,
                expected_version: variant.version,
            })
        })
        .collect();

    Reservation {
        accepted,
        skipped,
        stock_updates,
    }
}
