//! Category Model

use serde::{Deserialize, Serialize};

/// Category group (top navigation level)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryGroup {
    pub id: i64,
    pub name: String,
    pub position: i64,
}

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub category_group_id: i64,
    pub name: String,
    pub position: i64,
    pub link: String,
}

/// Group with its categories (listing view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroupWithCategories {
    #[serde(flatten)]
    pub group: CategoryGroup,
    pub categories: Vec<Category>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub category_group_id: i64,
    pub name: String,
    pub position: Option<i64>,
    pub link: Option<String>,
}

/// Update category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub category_group_id: Option<i64>,
    pub name: Option<String>,
    pub position: Option<i64>,
    pub link: Option<String>,
}
