//! Represents a home-page carousel slide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A carousel slide row. Slides are ordered by `display_order` and their
/// image URLs are unique across the table.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Carousel {
    /// Row id, assigned by the database.
    pub id: i64,

    /// Optional caption shown over the slide.
    pub title: Option<String>,

    /// Absolute URL of the slide image; unique.
    pub image_url: String,

    /// Optional click-through target.
    pub link_url: Option<String>,

    /// Position of the slide within the carousel.
    pub display_order: i64,

    /// When this row was created.
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a slide.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselInput {
    pub title: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}
