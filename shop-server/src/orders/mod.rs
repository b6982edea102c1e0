//! Order domain
//!
//! The creation pipeline runs intake → catalog read → stock reservation →
//! persist, all inside one store transaction:
//!
//! - [`catalog`] — batched variant read and optimistic stock writes
//! - [`reservation`] — the pure skip/clamp availability policy
//! - `persister` — transaction orchestration, retries, timeout, cancellation
//!
//! Auxiliary operations (status/notes update, queries) live here and never
//! touch records or stock.

pub mod catalog;
pub mod reservation;

mod persister;


pub use persister::create_order;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::repository::{RepoError, order as order_repo};
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderRecord, OrderRecordView, OrderUpdateRequest, OrderView};

/// Failures surfaced by the order core
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order with such an id does not exist")]
    NotFound,

    #[error("The order contains no products")]
    EmptyOrder,

    #[error("Stock reservation kept conflicting with concurrent orders")]
    Conflict,

    /// Store unavailable or the transaction timed out; caller may retry
    #[error("Store unavailable: {0}")]
    Transient(String),

    /// Malformed input that upstream validation missed
    #[error("Invalid order request: {0}")]
    Invalid(String),

    /// Cancellation acknowledged before commit; nothing was persisted
    #[error("Order creation was cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound => AppError::new(ErrorCode::OrderNotFound),
            OrderError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            OrderError::Conflict => AppError::new(ErrorCode::StockConflict),
            OrderError::Transient(msg) => {
                AppError::new(ErrorCode::ServiceUnavailable).with_detail("cause", msg)
            }
            OrderError::Invalid(msg) => AppError::validation(msg),
            OrderError::Cancelled => AppError::new(ErrorCode::RequestCancelled),
            OrderError::Internal(msg) => {
                AppError::new(ErrorCode::InternalError).with_detail("cause", msg)
            }
        }
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => OrderError::NotFound,
            RepoError::Database(msg) => OrderError::Transient(msg),
            RepoError::Validation(msg) => OrderError::Invalid(msg),
        }
    }
}

fn record_view(record: OrderRecord) -> OrderRecordView {
    OrderRecordView {
        product_instance_id: record.product_instance_id,
        product_name: record.product_name,
        price: record.price,
        quantity: record.quantity,
        fulfillment: None,
    }
}

/// Update status and notes of an existing order
pub async fn update_order(
    pool: &SqlitePool,
    order_id: i64,
    update: &OrderUpdateRequest,
) -> Result<OrderView, OrderError> {
    let order =
        order_repo::update_status_notes(pool, order_id, &update.status, update.notes.as_deref())
            .await?;
    let records = order_repo::find_records(pool, &[order_id]).await?;
    Ok(order.into_view(records.into_iter().map(record_view).collect()))
}

/// List orders, optionally restricted to one user
pub async fn get_orders(
    pool: &SqlitePool,
    user_id: Option<&str>,
) -> Result<Vec<OrderView>, OrderError> {
    let orders = order_repo::find_all(pool, user_id).await?;
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut records_by_order = std::collections::HashMap::<i64, Vec<OrderRecordView>>::new();
    for record in order_repo::find_records(pool, &ids).await? {
        records_by_order
            .entry(record.order_id)
            .or_default()
            .push(record_view(record));
    }
    Ok(orders
        .into_iter()
        .map(|order| {
            let records = records_by_order.remove(&order.id).unwrap_or_default();
            order.into_view(records)
        })
        .collect())
}

/// Fetch a single order, `None` when it does not exist
pub async fn get_order_by_id(
    pool: &SqlitePool,
    order_id: i64,
) -> Result<Option<OrderView>, OrderError> {
    let Some(order) = order_repo::find_by_id(pool, order_id).await? else {
        return Ok(None);
    };
    let records = order_repo::find_records(pool, &[order_id]).await?;
    Ok(Some(
        order.into_view(records.into_iter().map(record_view).collect()),
    ))
}
