//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Category reference
    pub category_id: i64,
    /// Running average of feedback ratings
    pub rating: f64,
    pub times_rated: i64,
}

/// Product variant (concrete sellable SKU under a product)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductInstance {
    pub id: i64,
    pub product_id: i64,
    /// Price in cents
    pub price: i64,
    /// Absolute discount in cents (0..=price); stored, not applied to orders
    pub absolute_discount: i64,
    /// Percentage discount (0–100); stored, not applied to orders
    pub percentage_discount: i64,
    pub stock_quantity: i64,
    /// Optimistic-concurrency column, bumped on every stock write
    pub version: i64,
    pub sku: String,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

/// Create variant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInstanceCreate {
    pub price: i64,
    pub absolute_discount: Option<i64>,
    pub percentage_discount: Option<i64>,
    pub stock_quantity: i64,
    pub sku: String,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Update variant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInstanceUpdate {
    pub price: Option<i64>,
    pub absolute_discount: Option<i64>,
    pub percentage_discount: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub sku: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Product with its variants (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithInstances {
    #[serde(flatten)]
    pub product: Product,
    pub instances: Vec<ProductInstance>,
}

/// List query: filters and sort toggles
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub sort_by_price: bool,
    #[serde(default)]
    pub sort_by_rating: bool,
    #[serde(default)]
    pub sort_asc: bool,
}

/// Feedback entry left by a user on a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductFeedback {
    pub id: i64,
    pub product_id: i64,
    pub user_id: Option<String>,
    pub created: i64,
    pub rating: i64,
    pub review: String,
}

/// Create feedback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFeedbackCreate {
    pub rating: i64,
    pub review: String,
}
