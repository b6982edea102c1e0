//! User Repository
//!
//! Management surface only: identity and authentication live in an
//! external provider, so user ids are opaque strings here.

use super::{RepoError, RepoResult};
use shared::models::{Role, User, UserWithRoles};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, email, is_oidc_user, first_name, last_name, date_of_birth, city, delivery_address FROM users";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<UserWithRoles>> {
    let users = sqlx::query_as::<_, User>(&format!("{} ORDER BY email", USER_SELECT))
        .fetch_all(pool)
        .await?;

    // Single pass over all role assignments instead of a query per user
    let assignments: Vec<(String, String)> = sqlx::query_as(
        "SELECT ur.user_id, r.name FROM user_roles ur JOIN roles r ON r.id = ur.role_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(users
        .into_iter()
        .map(|user| {
            let roles = assignments
                .iter()
                .filter(|(user_id, _)| *user_id == user.id)
                .map(|(_, role)| role.clone())
                .collect();
            UserWithRoles { user, roles }
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<UserWithRoles>> {
    let sql = format!("{} WHERE id = ?", USER_SELECT);
    let Some(user) = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    let roles = find_roles_of(pool, id).await?;
    Ok(Some(UserWithRoles { user, roles }))
}

async fn find_roles_of(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<String>> {
    let roles: Vec<String> = sqlx::query_scalar(
        "SELECT r.name FROM user_roles ur JOIN roles r ON r.id = ur.role_id WHERE ur.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_all_roles(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(roles)
}

/// Replace the user's role set
///
/// Every requested role must exist; otherwise the allowed list is reported
/// and nothing changes.
pub async fn change_roles(
    pool: &SqlitePool,
    user_id: &str,
    roles: &[String],
) -> RepoResult<UserWithRoles> {
    let all_roles = find_all_roles(pool).await?;
    if let Some(unknown) = roles.iter().find(|r| !all_roles.iter().any(|a| a.name == **r)) {
        let allowed = all_roles
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(RepoError::Validation(format!(
            "Role {unknown} does not exist. Allowed roles include: {allowed}"
        )));
    }

    let mut tx = pool.begin().await?;

    let exists: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }

    sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    for role in roles {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT ?1, id FROM roles WHERE name = ?2",
        )
        .bind(user_id)
        .bind(role)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}

pub async fn delete(pool: &SqlitePool, user_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
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
            "CREATE TABLE users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                is_oidc_user INTEGER NOT NULL DEFAULT 0,
                first_name TEXT,
                last_name TEXT,
                date_of_birth TEXT,
                city TEXT,
                delivery_address TEXT
            )",
            "CREATE TABLE roles (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)",
            "CREATE TABLE user_roles (
                user_id TEXT NOT NULL,
                role_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, role_id)
            )",
        ] {
            sqlx::query(ddl).execute(&pool).await.unwrap();
        }

        sqlx::query("INSERT INTO roles (name) VALUES ('Administrator'), ('Manager'), ('Registered user')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO users (id, email) VALUES ('u1', 'ada@example.com')")
            .execute(&pool)
            .await
            .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_change_roles_replaces_set() {
        let pool = test_pool().await;
        let user = change_roles(&pool, "u1", &["Manager".into(), "Registered user".into()])
            .await
            .unwrap();
        assert_eq!(user.roles.len(), 2);

        let user = change_roles(&pool, "u1", &["Administrator".into()]).await.unwrap();
        assert_eq!(user.roles, vec!["Administrator".to_string()]);
    }

    #[tokio::test]
    async fn test_change_roles_rejects_unknown_role() {
        let pool = test_pool().await;
        let err = change_roles(&pool, "u1", &["Emperor".into()]).await.unwrap_err();
        match err {
            RepoError::Validation(msg) => {
                assert!(msg.contains("Emperor"));
                assert!(msg.contains("Administrator"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Unchanged
        let user = find_by_id(&pool, "u1").await.unwrap().unwrap();
        assert!(user.roles.is_empty());
    }

    #[tokio::test]
    async fn test_change_roles_missing_user() {
        let pool = test_pool().await;
        let err = change_roles(&pool, "ghost", &[]).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let pool = test_pool().await;
        delete(&pool, "u1").await.unwrap();
        assert!(find_by_id(&pool, "u1").await.unwrap().is_none());
        assert!(matches!(delete(&pool, "u1").await.unwrap_err(), RepoError::NotFound(_)));
    }
}
