//! Input validation helpers
//!
//! Centralized text length constants and validation functions. The core
//! re-checks the essentials on its own (defense in depth); these helpers
//! reject malformed requests at the HTTP boundary before the core sees
//! them.

use shared::models::{CustomerInfo, ProductInstanceCreate, ProductInstanceUpdate};

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Entity names: product, category, role, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reviews
pub const MAX_NOTE_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Stock keeping unit
pub const MIN_SKU_LEN: usize = 3;
pub const MAX_SKU_LEN: usize = 50;

/// Price ceiling in cents
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Domain rules ────────────────────────────────────────────────────

fn is_valid_sku_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || "#/-():_".contains(c)
}

/// SKU: 3–50 chars of letters, numbers, spaces and `#/-():_`
pub fn validate_sku(sku: &str) -> Result<(), AppError> {
    if sku.chars().count() < MIN_SKU_LEN {
        return Err(AppError::validation(
            "Stock keeping unit (SKU) must be at least 3 characters long.",
        ));
    }
    if sku.chars().count() > MAX_SKU_LEN {
        return Err(AppError::validation(
            "Stock keeping unit (SKU) cannot be longer than 50 characters.",
        ));
    }
    if !sku.chars().all(is_valid_sku_char) {
        return Err(AppError::validation(
            "Stock keeping unit (SKU) may contain only letters, numbers, spaces and characters #/-():_.",
        ));
    }
    Ok(())
}

fn validate_instance_rules(
    price: i64,
    absolute_discount: i64,
    percentage_discount: i64,
    stock_quantity: i64,
) -> Result<(), AppError> {
    if price <= 0 {
        return Err(AppError::validation("Product price must be greater than 0."));
    }
    if price >= MAX_PRICE_CENTS {
        return Err(AppError::validation(format!(
            "Product price must be less than {MAX_PRICE_CENTS}."
        )));
    }
    if stock_quantity < 0 {
        return Err(AppError::validation(
            "Stock Quantity must be greater than or equal to 0.",
        ));
    }
    if absolute_discount < 0 || absolute_discount > price {
        return Err(AppError::validation(
            "Absolute discount must be between 0 and the product price.",
        ));
    }
    if !(0..=100).contains(&percentage_discount) {
        return Err(AppError::validation(
            "Percentage discount must be between 0 and 100.",
        ));
    }
    Ok(())
}

pub fn validate_instance_create(data: &ProductInstanceCreate) -> Result<(), AppError> {
    validate_sku(&data.sku)?;
    validate_instance_rules(
        data.price,
        data.absolute_discount.unwrap_or(0),
        data.percentage_discount.unwrap_or(0),
        data.stock_quantity,
    )
}

/// Update payloads validate the fields they carry
pub fn validate_instance_update(data: &ProductInstanceUpdate) -> Result<(), AppError> {
    if let Some(sku) = &data.sku {
        validate_sku(sku)?;
    }
    if let Some(price) = data.price {
        if price <= 0 || price >= MAX_PRICE_CENTS {
            return Err(AppError::validation(
                "Product price must be greater than 0 and below the ceiling.",
            ));
        }
    }
    if let Some(stock) = data.stock_quantity
        && stock < 0
    {
        return Err(AppError::validation(
            "Stock Quantity must be greater than or equal to 0.",
        ));
    }
    if let Some(pct) = data.percentage_discount
        && !(0..=100).contains(&pct)
    {
        return Err(AppError::validation(
            "Percentage discount must be between 0 and 100.",
        ));
    }
    if let Some(abs) = data.absolute_discount
        && abs < 0
    {
        return Err(AppError::validation(
            "Absolute discount must be greater than or equal to 0.",
        ));
    }
    Ok(())
}

pub fn validate_customer(customer: &CustomerInfo) -> Result<(), AppError> {
    validate_required_text(&customer.first_name, "firstName", MAX_NAME_LEN)?;
    validate_required_text(&customer.last_name, "lastName", MAX_NAME_LEN)?;
    validate_required_text(&customer.email, "email", MAX_EMAIL_LEN)?;
    if !customer.email.contains('@') {
        return Err(AppError::validation("email is not a valid address"));
    }
    validate_required_text(&customer.phone_number, "phoneNumber", MAX_NAME_LEN)?;
    validate_required_text(&customer.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&customer.delivery_address, "deliveryAddress", MAX_NOTE_LEN)?;
    Ok(())
}
