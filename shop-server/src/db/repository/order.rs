//! Order Repository
//!
//! Read and update access to persisted orders. Order creation does not go
//! through here — the transactional core in `crate::orders` owns its own
//! writes.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderRecord};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, user_id, first_name, last_name, email, phone_number, city, delivery_address, order_date, status, payment_received, notes FROM orders";

const RECORD_SELECT: &str =
    "SELECT id, order_id, product_instance_id, product_name, price, quantity FROM order_record";

pub async fn find_all(pool: &SqlitePool, user_id: Option<&str>) -> RepoResult<Vec<Order>> {
    let rows = if let Some(user_id) = user_id {
        let sql = format!("{} WHERE user_id = ? ORDER BY order_date DESC", ORDER_SELECT);
        sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?
    } else {
        let sql = format!("{} ORDER BY order_date DESC", ORDER_SELECT);
        sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE id = ?", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch the records of a batch of orders in one query
pub async fn find_records(pool: &SqlitePool, order_ids: &[i64]) -> RepoResult<Vec<OrderRecord>> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; order_ids.len()].join(", ");
    let sql = format!(
        "{} WHERE order_id IN ({}) ORDER BY order_id, id",
        RECORD_SELECT, placeholders
    );
    let mut query = sqlx::query_as::<_, OrderRecord>(&sql);
    for id in order_ids {
        query = query.bind(*id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Update status and notes; records and stock are never touched here
pub async fn update_status_notes(
    pool: &SqlitePool,
    id: i64,
    status: &str,
    notes: Option<&str>,
) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET status = ?1, notes = ?2 WHERE id = ?3")
        .bind(status)
        .bind(notes)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}
