//! User Model
//!
//! Authentication lives outside this service; user ids arrive as strings
//! from the identity provider. Only the management surface (roles, profile
//! data) is stored here.

use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    /// External-identity id
    pub id: String,
    pub email: String,
    pub is_oidc_user: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub city: Option<String>,
    pub delivery_address: Option<String>,
}

/// Role entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// User with resolved role names (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<String>,
}
