//! Product Repository
//!
//! Catalog CRUD: products, variants and feedback. Feedback writes also
//! maintain the product's running rating average.

use super::{RepoError, RepoResult};
use shared::models::{
    Product, ProductCreate, ProductFeedback, ProductFeedbackCreate, ProductInstance,
    ProductInstanceCreate, ProductInstanceUpdate, ProductQuery, ProductUpdate,
    ProductWithInstances,
};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str =
    "SELECT p.id, p.name, p.description, p.category_id, p.rating, p.times_rated FROM product p";

const INSTANCE_SELECT: &str = "SELECT id, product_id, price, absolute_discount, percentage_discount, stock_quantity, version, sku, color, size FROM product_instance";

pub async fn find_all(pool: &SqlitePool, query: &ProductQuery) -> RepoResult<Vec<Product>> {
    let mut sql = format!("{} JOIN category c ON c.id = p.category_id", PRODUCT_SELECT);

    let mut clauses: Vec<&str> = Vec::new();
    if query.category.is_some() {
        clauses.push("c.name = ?");
    }
    if query.name.is_some() {
        clauses.push("LOWER(p.name) LIKE ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    // Price sorts on the cheapest variant; rating on the running average
    if query.sort_by_price {
        sql.push_str(" ORDER BY (SELECT MIN(price) FROM product_instance pi WHERE pi.product_id = p.id)");
        sql.push_str(if query.sort_asc { " ASC" } else { " DESC" });
    } else if query.sort_by_rating {
        sql.push_str(" ORDER BY p.rating");
        sql.push_str(if query.sort_asc { " ASC" } else { " DESC" });
    }

    let mut q = sqlx::query_as::<_, Product>(&sql);
    if let Some(category) = &query.category {
        q = q.bind(category.clone());
    }
    if let Some(name) = &query.name {
        q = q.bind(format!("%{}%", name.to_lowercase()));
    }

    Ok(q.fetch_all(pool).await?)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{} WHERE p.id = ?", PRODUCT_SELECT);
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find a product together with all its variants
pub async fn find_with_instances(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<ProductWithInstances>> {
    let Some(product) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let sql = format!("{} WHERE product_id = ? ORDER BY id", INSTANCE_SELECT);
    let instances = sqlx::query_as::<_, ProductInstance>(&sql)
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(Some(ProductWithInstances { product, instances }))
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    ensure_category_exists(pool, data.category_id).await?;

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, description, category_id, rating, times_rated) VALUES (?1, ?2, ?3, ?4, 0, 0)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.description.unwrap_or_default())
    .bind(data.category_id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(category_id) = data.category_id {
        ensure_category_exists(pool, category_id).await?;
    }

    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), category_id = COALESCE(?3, category_id) WHERE id = ?4",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.category_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

async fn ensure_category_exists(pool: &SqlitePool, category_id: i64) -> RepoResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    if found.is_none() {
        return Err(RepoError::Validation(format!(
            "Category {category_id} does not exist. Create the category first or specify another category."
        )));
    }
    Ok(())
}

// ── Variants ────────────────────────────────────────────────────────

pub async fn find_instance(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductInstance>> {
    let sql = format!("{} WHERE id = ?", INSTANCE_SELECT);
    let row = sqlx::query_as::<_, ProductInstance>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_instance(
    pool: &SqlitePool,
    product_id: i64,
    data: ProductInstanceCreate,
) -> RepoResult<ProductInstance> {
    if find_by_id(pool, product_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Product {product_id} not found")));
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product_instance (id, product_id, price, absolute_discount, percentage_discount, stock_quantity, version, sku, color, size) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(product_id)
    .bind(data.price)
    .bind(data.absolute_discount.unwrap_or(0))
    .bind(data.percentage_discount.unwrap_or(0))
    .bind(data.stock_quantity)
    .bind(&data.sku)
    .bind(data.color)
    .bind(data.size)
    .execute(pool)
    .await?;

    find_instance(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product variant".into()))
}

/// Update a variant
///
/// Every update bumps `version` so in-flight order transactions observe
/// the change and retry.
pub async fn update_instance(
    pool: &SqlitePool,
    product_id: i64,
    instance_id: i64,
    data: ProductInstanceUpdate,
) -> RepoResult<ProductInstance> {
    let rows = sqlx::query(
        "UPDATE product_instance SET price = COALESCE(?1, price), absolute_discount = COALESCE(?2, absolute_discount), percentage_discount = COALESCE(?3, percentage_discount), stock_quantity = COALESCE(?4, stock_quantity), sku = COALESCE(?5, sku), color = COALESCE(?6, color), size = COALESCE(?7, size), version = version + 1 WHERE id = ?8 AND product_id = ?9",
    )
    .bind(data.price)
    .bind(data.absolute_discount)
    .bind(data.percentage_discount)
    .bind(data.stock_quantity)
    .bind(data.sku)
    .bind(data.color)
    .bind(data.size)
    .bind(instance_id)
    .bind(product_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Product variant {instance_id} not found"
        )));
    }
    find_instance(pool, instance_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product variant {instance_id} not found")))
}

// ── Feedback ────────────────────────────────────────────────────────

/// Append a feedback entry and fold its rating into the running average:
/// `rating = (rating * times_rated + new) / (times_rated + 1)`
pub async fn add_feedback(
    pool: &SqlitePool,
    product_id: i64,
    user_id: Option<&str>,
    data: ProductFeedbackCreate,
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let product: Option<(f64, i64)> =
        sqlx::query_as("SELECT rating, times_rated FROM product WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((rating, times_rated)) = product else {
        return Err(RepoError::NotFound(format!("Product {product_id} not found")));
    };

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO product_feedback (id, product_id, user_id, created, rating, review) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(product_id)
    .bind(user_id)
    .bind(now)
    .bind(data.rating)
    .bind(&data.review)
    .execute(&mut *tx)
    .await?;

    let new_rating = (rating * times_rated as f64 + data.rating as f64) / (times_rated + 1) as f64;
    sqlx::query("UPDATE product SET rating = ?1, times_rated = times_rated + 1 WHERE id = ?2")
        .bind(new_rating)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn find_feedback_by_product(
    pool: &SqlitePool,
    product_id: i64,
) -> RepoResult<Vec<ProductFeedback>> {
    if find_by_id(pool, product_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Product {product_id} not found")));
    }
    let rows = sqlx::query_as::<_, ProductFeedback>(
        "SELECT id, product_id, user_id, created, rating, review FROM product_feedback WHERE product_id = ? ORDER BY created DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_all_feedback(
    pool: &SqlitePool,
    category: Option<&str>,
) -> RepoResult<Vec<ProductFeedback>> {
    let rows = if let Some(category) = category {
        sqlx::query_as::<_, ProductFeedback>(
            "SELECT f.id, f.product_id, f.user_id, f.created, f.rating, f.review FROM product_feedback f JOIN product p ON p.id = f.product_id JOIN category c ON c.id = p.category_id WHERE c.name = ? ORDER BY f.created DESC",
        )
        .bind(category)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, ProductFeedback>(
            "SELECT id, product_id, user_id, created, rating, review FROM product_feedback ORDER BY created DESC",
        )
        .fetch_all(pool)
        .await?
    };
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory SQLite pool with the catalog schema for product tests.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE category_group (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE category (
                id INTEGER PRIMARY KEY,
                category_group_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                link TEXT NOT NULL DEFAULT ''
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE product (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category_id INTEGER NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                times_rated INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE product_instance (
                id INTEGER PRIMARY KEY,
                product_id INTEGER NOT NULL,
                price INTEGER NOT NULL,
                absolute_discount INTEGER NOT NULL DEFAULT 0,
                percentage_discount INTEGER NOT NULL DEFAULT 0,
                stock_quantity INTEGER NOT NULL DEFAULT 0,
                version INTEGER NOT NULL DEFAULT 0,
                sku TEXT NOT NULL,
                color TEXT,
                size TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE product_feedback (
                id INTEGER PRIMARY KEY,
                product_id INTEGER NOT NULL,
                user_id TEXT,
                created INTEGER NOT NULL,
                rating INTEGER NOT NULL,
                review TEXT NOT NULL DEFAULT ''
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        // Seed: one group, two categories
        sqlx::query("INSERT INTO category_group (id, name) VALUES (1, 'Apparel')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO category (id, category_group_id, name) VALUES (1, 1, 'Shirts'), (2, 1, 'Shoes')")
            .execute(&pool)
            .await
            .unwrap();

        pool
    }

    fn product_create(name: &str, category_id: i64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            description: Some(format!("{name} description")),
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_product() {
        let pool = test_pool().await;
        let created = create(&pool, product_create("Linen shirt", 1)).await.unwrap();
        let found = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Linen shirt");
        assert_eq!(found.category_id, 1);
        assert_eq!(found.times_rated, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_category() {
        let pool = test_pool().await;
        let err = create(&pool, product_create("Ghost", 99)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_product_partial() {
        let pool = test_pool().await;
        let created = create(&pool, product_create("Shirt", 1)).await.unwrap();
        let updated = update(
            &pool,
            created.id,
            ProductUpdate {
                name: Some("Shirt v2".into()),
                description: None,
                category_id: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Shirt v2");
        assert_eq!(updated.category_id, 2);
        assert_eq!(updated.description, "Shirt description");
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let pool = test_pool().await;
        let err = delete(&pool, 12345).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_category_and_name() {
        let pool = test_pool().await;
        create(&pool, product_create("Linen shirt", 1)).await.unwrap();
        create(&pool, product_create("Denim shirt", 1)).await.unwrap();
        create(&pool, product_create("Running shoe", 2)).await.unwrap();

        let shirts = find_all(
            &pool,
            &ProductQuery {
                category: Some("Shirts".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(shirts.len(), 2);

        let linen = find_all(
            &pool,
            &ProductQuery {
                name: Some("LINEN".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(linen.len(), 1);
        assert_eq!(linen[0].name, "Linen shirt");
    }

    #[tokio::test]
    async fn test_list_sorts_by_cheapest_variant() {
        let pool = test_pool().await;
        let a = create(&pool, product_create("A", 1)).await.unwrap();
        let b = create(&pool, product_create("B", 1)).await.unwrap();
        create_instance(&pool, a.id, instance_create(3000, 5)).await.unwrap();
        create_instance(&pool, b.id, instance_create(1000, 5)).await.unwrap();

        let asc = find_all(
            &pool,
            &ProductQuery {
                sort_by_price: true,
                sort_asc: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(asc[0].name, "B");
        assert_eq!(asc[1].name, "A");
    }

    fn instance_create(price: i64, stock: i64) -> ProductInstanceCreate {
        ProductInstanceCreate {
            price,
            absolute_discount: None,
            percentage_discount: None,
            stock_quantity: stock,
            sku: "SKU-001".into(),
            color: None,
            size: None,
        }
    }

    #[tokio::test]
    async fn test_create_instance_and_version_bump_on_update() {
        let pool = test_pool().await;
        let product = create(&pool, product_create("Shirt", 1)).await.unwrap();
        let instance = create_instance(&pool, product.id, instance_create(2500, 10))
            .await
            .unwrap();
        assert_eq!(instance.version, 0);
        assert_eq!(instance.stock_quantity, 10);

        let updated = update_instance(
            &pool,
            product.id,
            instance.id,
            ProductInstanceUpdate {
                stock_quantity: Some(25),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.stock_quantity, 25);
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn test_rating_running_average_recurrence() {
        let pool = test_pool().await;
        let product = create(&pool, product_create("Shirt", 1)).await.unwrap();

        let ratings = [5i64, 3, 4, 1, 2, 5, 4];
        let mut expected = 0.0f64;
        for (n, r) in ratings.iter().enumerate() {
            add_feedback(
                &pool,
                product.id,
                Some("u1"),
                ProductFeedbackCreate {
                    rating: *r,
                    review: String::new(),
                },
            )
            .await
            .unwrap();

            // new_avg = (old_avg * old_n + rating) / (old_n + 1)
            expected = (expected * n as f64 + *r as f64) / (n as f64 + 1.0);
            let p = find_by_id(&pool, product.id).await.unwrap().unwrap();
            assert!((p.rating - expected).abs() < 1e-9, "after {} ratings", n + 1);
            assert_eq!(p.times_rated, n as i64 + 1);
        }

        // Final average equals the arithmetic mean
        let mean = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
        let p = find_by_id(&pool, product.id).await.unwrap().unwrap();
        assert!((p.rating - mean).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_feedback_listing_newest_first() {
        let pool = test_pool().await;
        let product = create(&pool, product_create("Shirt", 1)).await.unwrap();
        for r in [4, 5] {
            add_feedback(
                &pool,
                product.id,
                None,
                ProductFeedbackCreate {
                    rating: r,
                    review: format!("review {r}"),
                },
            )
            .await
            .unwrap();
        }
        let feedback = find_feedback_by_product(&pool, product.id).await.unwrap();
        assert_eq!(feedback.len(), 2);

        let err = find_feedback_by_product(&pool, 777).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
