//! Catalog Reader
//!
//! Batched variant resolution for the order-creation transaction. Reads
//! and stock writes run on the same transaction; stock read outside of it
//! is advisory only.

use std::collections::BTreeMap;

use sqlx::{Sqlite, Transaction};

use super::reservation::StockUpdate;

/// A variant as seen by the creation transaction: owning product name,
/// unit price, current stock and the optimistic-concurrency version.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantSnapshot {
    pub id: i64,
    pub product_name: String,
    pub price: i64,
    pub stock: i64,
    pub version: i64,
}

/// Resolve the requested variant ids in one batched read.
///
/// Missing ids are simply absent from the map; the reservation policy
/// reports them per line. The result is keyed ascending, which also fixes
/// the stock-update order.
pub async fn read_variants(
    tx: &mut Transaction<'_, Sqlite>,
    ids: &[i64],
) -> sqlx::Result<BTreeMap<i64, VariantSnapshot>> {
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT pi.id, p.name AS product_name, pi.price, pi.stock_quantity AS stock, pi.version \
         FROM product_instance pi JOIN product p ON p.id = pi.product_id \
         WHERE pi.id IN ({placeholders}) ORDER BY pi.id"
    );

    let mut query = sqlx::query_as::<_, VariantSnapshot>(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query.fetch_all(&mut **tx).await?;
    Ok(rows.into_iter().map(|v| (v.id, v)).collect())
}

/// Write one stock decrement under the optimistic version guard.
///
/// Returns `false` when the variant's version moved since the read — the
/// caller must abandon the transaction and retry.
pub async fn apply_stock_update(
    tx: &mut Transaction<'_, Sqlite>,
    update: &StockUpdate,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE product_instance SET stock_quantity = ?1, version = version + 1 \
         WHERE id = ?2 AND version = ?3",
    )
    .bind(update.new_stock)
    .bind(update.product_instance_id)
    .bind(update.expected_version)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}
