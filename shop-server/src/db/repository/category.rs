//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryGroup, CategoryGroupWithCategories, CategoryUpdate};
use sqlx::SqlitePool;

const CATEGORY_SELECT: &str =
    "SELECT id, category_group_id, name, position, link FROM category";

/// List all groups with their categories, ordered by position
pub async fn find_all_grouped(pool: &SqlitePool) -> RepoResult<Vec<CategoryGroupWithCategories>> {
    let groups = sqlx::query_as::<_, CategoryGroup>(
        "SELECT id, name, position FROM category_group ORDER BY position, id",
    )
    .fetch_all(pool)
    .await?;

    let categories = sqlx::query_as::<_, Category>(&format!(
        "{} ORDER BY position, id",
        CATEGORY_SELECT
    ))
    .fetch_all(pool)
    .await?;

    let mut result: Vec<CategoryGroupWithCategories> = groups
        .into_iter()
        .map(|group| CategoryGroupWithCategories {
            group,
            categories: Vec::new(),
        })
        .collect();
    for category in categories {
        if let Some(entry) = result
            .iter_mut()
            .find(|g| g.group.id == category.category_group_id)
        {
            entry.categories.push(category);
        }
    }
    Ok(result)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("{} WHERE id = ?", CATEGORY_SELECT);
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_group(pool: &SqlitePool, name: &str, position: i64) -> RepoResult<CategoryGroup> {
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO category_group (id, name, position) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(name)
        .bind(position)
        .execute(pool)
        .await?;
    let group = sqlx::query_as::<_, CategoryGroup>(
        "SELECT id, name, position FROM category_group WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(group)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let group: Option<i64> = sqlx::query_scalar("SELECT id FROM category_group WHERE id = ?")
        .bind(data.category_group_id)
        .fetch_optional(pool)
        .await?;
    if group.is_none() {
        return Err(RepoError::Validation(format!(
            "Category group {} does not exist",
            data.category_group_id
        )));
    }

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO category (id, category_group_id, name, position, link) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(data.category_group_id)
    .bind(&data.name)
    .bind(data.position.unwrap_or(0))
    .bind(data.link.unwrap_or_default())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE category SET category_group_id = COALESCE(?1, category_group_id), name = COALESCE(?2, name), position = COALESCE(?3, position), link = COALESCE(?4, link) WHERE id = ?5",
    )
    .bind(data.category_group_id)
    .bind(data.name)
    .bind(data.position)
    .bind(data.link)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category; refuses while products still reference it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let in_use: Option<i64> =
        sqlx::query_scalar("SELECT id FROM product WHERE category_id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    if in_use.is_some() {
        return Err(RepoError::Validation(format!(
            "Category {id} still has products attached"
        )));
    }

    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        for ddl in [
            "CREATE TABLE category_group (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE TABLE category (
                id INTEGER PRIMARY KEY,
                category_group_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                link TEXT NOT NULL DEFAULT ''
            )",
            "CREATE TABLE product (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category_id INTEGER NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                times_rated INTEGER NOT NULL DEFAULT 0
            )",
        ] {
            sqlx::query(ddl).execute(&pool).await.unwrap();
        }

        pool
    }

    #[tokio::test]
    async fn test_group_and_category_listing() {
        let pool = test_pool().await;
        let group = create_group(&pool, "Apparel", 0).await.unwrap();
        create(
            &pool,
            CategoryCreate {
                category_group_id: group.id,
                name: "Shirts".into(),
                position: Some(2),
                link: None,
            },
        )
        .await
        .unwrap();
        create(
            &pool,
            CategoryCreate {
                category_group_id: group.id,
                name: "Shoes".into(),
                position: Some(1),
                link: Some("/shoes".into()),
            },
        )
        .await
        .unwrap();

        let listed = find_all_grouped(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].categories.len(), 2);
        // Ordered by position
        assert_eq!(listed[0].categories[0].name, "Shoes");
        assert_eq!(listed[0].categories[1].name, "Shirts");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_group() {
        let pool = test_pool().await;
        let err = create(
            &pool,
            CategoryCreate {
                category_group_id: 404,
                name: "Orphan".into(),
                position: None,
                link: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_refuses_category_in_use() {
        let pool = test_pool().await;
        let group = create_group(&pool, "Apparel", 0).await.unwrap();
        let category = create(
            &pool,
            CategoryCreate {
                category_group_id: group.id,
                name: "Shirts".into(),
                position: None,
                link: None,
            },
        )
        .await
        .unwrap();
        sqlx::query("INSERT INTO product (id, name, category_id) VALUES (1, 'Shirt', ?)")
            .bind(category.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = delete(&pool, category.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        sqlx::query("DELETE FROM product").execute(&pool).await.unwrap();
        delete(&pool, category.id).await.unwrap();
        assert!(find_by_id(&pool, category.id).await.unwrap().is_none());
    }
}
