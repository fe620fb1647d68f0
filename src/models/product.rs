//! Represents a product record in the shop catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog product row.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Product {
    /// Row id, assigned by the database.
    pub id: i64,

    /// Display name shown in listings.
    pub name: String,

    /// Optional long-form description.
    pub description: Option<String>,

    /// Unit price.
    pub price: f64,

    /// Units in stock.
    pub stock: i64,

    /// Absolute URL of the product image, usually an object-store URL.
    pub image_url: Option<String>,

    /// When this row was created.
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// One page of products plus the total row count.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}
