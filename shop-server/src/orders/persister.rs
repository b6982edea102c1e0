//! Order Persister
//!
//! Runs the whole creation pipeline inside one store transaction: batched
//! variant read, reservation policy, order + record inserts, then stock
//! decrements under optimistic version guards. A lost version race aborts
//! the attempt and the transaction is retried from scratch, up to three
//! times. Each attempt runs under a 5 second wall-clock budget.
//!
//! Cancellation observed before commit rolls the transaction back;
//! cancellation after commit is ignored — the order exists.

use std::time::Duration;

use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio_util::sync::CancellationToken;

use shared::models::{Order, OrderCreateRequest, OrderRecordView, OrderView};
use shared::util::{now_millis, snowflake_id};

use super::catalog;
use super::reservation::{self, Reservation};
use super::OrderError;

const MAX_COMMIT_ATTEMPTS: u32 = 3;
const TX_TIME_BUDGET: Duration = Duration::from_secs(5);

const INITIAL_STATUS: &str = "Created";

/// Create an order for `user_id` from the requested lines.
///
/// All-or-nothing at the store level; partial at the line level per the
/// reservation policy. Returns [`OrderError::EmptyOrder`] when no line
/// survives, with no store mutation.
pub async fn create_order(
    pool: &SqlitePool,
    user_id: &str,
    request: &OrderCreateRequest,
    cancel: &CancellationToken,
) -> Result<OrderView, OrderError> {
    // Defense in depth — upstream validation is expected to reject these
    if user_id.trim().is_empty() {
        return Err(OrderError::Invalid("user id must not be empty".into()));
    }
    if let Some(line) = request.order_records.iter().find(|l| l.quantity < 1) {
        return Err(OrderError::Invalid(format!(
            "quantity {} for variant {} must be at least 1",
            line.quantity, line.product_instance_id
        )));
    }
    if request.order_records.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        if cancel.is_cancelled() {
            return Err(OrderError::Cancelled);
        }

        let outcome = tokio::time::timeout(
            TX_TIME_BUDGET,
            attempt_create(pool, user_id, request, cancel),
        )
        .await;

        match outcome {
            Err(_) => {
                return Err(OrderError::Transient(
                    "order transaction exceeded its time budget".into(),
                ));
            }
            Ok(Ok(AttemptOutcome::Committed(view))) => return Ok(view),
            Ok(Ok(AttemptOutcome::Conflict)) => {
                tracing::warn!(attempt, user_id, "stock version conflict, retrying");
            }
            Ok(Err(AttemptError::Busy)) => {
                tracing::warn!(attempt, user_id, "store busy, retrying");
            }
            Ok(Err(AttemptError::Abort(err))) => {
                if matches!(err, OrderError::Transient(_) | OrderError::Internal(_)) {
                    tracing::error!(
                        user_id,
                        customer = ?request.customer,
                        lines = request.order_records.len(),
                        error = %err,
                        "failed to persist order"
                    );
                }
                return Err(err);
            }
        }
    }

    Err(OrderError::Conflict)
}

enum AttemptOutcome {
    Committed(OrderView),
    /// A stock version moved under us; the transaction was abandoned
    Conflict,
}

enum AttemptError {
    /// The store reported lock contention; worth another attempt
    Busy,
    Abort(OrderError),
}

impl From<sqlx::Error> for AttemptError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let msg = db.message();
            if msg.contains("locked") || msg.contains("busy") {
                return AttemptError::Busy;
            }
        }
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => AttemptError::Abort(OrderError::Transient(err.to_string())),
            other => AttemptError::Abort(OrderError::Internal(other.to_string())),
        }
    }
}

/// One transactional attempt. Early returns drop the transaction, which
/// rolls it back.
async fn attempt_create(
    pool: &SqlitePool,
    user_id: &str,
    request: &OrderCreateRequest,
    cancel: &CancellationToken,
) -> Result<AttemptOutcome, AttemptError> {
    let mut tx = pool.begin().await?;

    // Distinct ids, ascending — fixes the read and write order
    let mut ids: Vec<i64> = request
        .order_records
        .iter()
        .map(|l| l.product_instance_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let variants = catalog::read_variants(&mut tx, &ids).await?;
    let reservation = reservation::reserve(&request.order_records, &variants);

    if reservation.accepted.is_empty() {
        return Err(AttemptError::Abort(OrderError::EmptyOrder));
    }

    let customer = &request.customer;
    let order = Order {
        id: snowflake_id(),
        user_id: user_id.to_string(),
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        email: customer.email.clone(),
        phone_number: customer.phone_number.clone(),
        city: customer.city.clone(),
        delivery_address: customer.delivery_address.clone(),
        order_date: now_millis(),
        status: INITIAL_STATUS.to_string(),
        payment_received: false,
        notes: None,
    };

    insert_order(&mut tx, &order).await?;
    insert_records(&mut tx, order.id, &reservation).await?;

    for update in &reservation.stock_updates {
        if !catalog::apply_stock_update(&mut tx, update).await? {
            return Ok(AttemptOutcome::Conflict);
        }
    }

    if cancel.is_cancelled() {
        // Abandon the transaction before acknowledging cancellation
        tx.rollback().await.map_err(AttemptError::from)?;
        return Err(AttemptError::Abort(OrderError::Cancelled));
    }

    tx.commit().await?;
    // Cancellation observed from here on is ignored — the order exists

    Ok(AttemptOutcome::Committed(build_view(order, reservation)))
}

async fn insert_order(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, first_name, last_name, email, phone_number, city, delivery_address, order_date, status, payment_received, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(order.id)
    .bind(&order.user_id)
    .bind(&order.first_name)
    .bind(&order.last_name)
    .bind(&order.email)
    .bind(&order.phone_number)
    .bind(&order.city)
    .bind(&order.delivery_address)
    .bind(order.order_date)
    .bind(&order.status)
    .bind(order.payment_received)
    .bind(&order.notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_records(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    reservation: &Reservation,
) -> sqlx::Result<()> {
    for line in &reservation.accepted {
        sqlx::query(
            "INSERT INTO order_record (id, order_id, product_instance_id, product_name, price, quantity) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(snowflake_id())
        .bind(order_id)
        .bind(line.product_instance_id)
        .bind(&line.product_name)
        .bind(line.price)
        .bind(line.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

fn build_view(order: Order, reservation: Reservation) -> OrderView {
    let records = reservation
        .accepted
        .into_iter()
        .map(|line| OrderRecordView {
            product_instance_id: line.product_instance_id,
            product_name: line.product_name,
            price: line.price,
            quantity: line.quantity,
            fulfillment: Some(line.fulfillment),
        })
        .collect();
    let mut view = order.into_view(records);
    view.skipped_lines = reservation.skipped;
    view
}
