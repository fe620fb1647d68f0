//! src/services/catalog_service.rs
//!
//! CatalogService — plain CRUD over the product and carousel tables in
//! SQLite. No invariant lives here beyond the carousel image-URL
//! uniqueness check; everything else is persistence mapping.

use crate::models::{
    carousel::{Carousel, CarouselInput},
    product::{Product, ProductInput, ProductPage},
};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product `{0}` not found")]
    ProductNotFound(i64),
    #[error("carousel `{0}` not found")]
    CarouselNotFound(i64),
    #[error("image url `{0}` is already registered")]
    DuplicateImageUrl(String),
    #[error("page must be non-negative and size positive")]
    InvalidPage,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, image_url, created_at";
const CAROUSEL_COLUMNS: &str = "id, title, image_url, link_url, display_order, created_at";

/// Map a caller-supplied sort field onto a known product column. Unknown
/// fields fall back to `id` rather than reaching the query text.
fn product_sort_column(sort_field: Option<&str>) -> &'static str {
    match sort_field {
        Some("name") => "name",
        Some("price") => "price",
        Some("stock") => "stock",
        _ => "id",
    }
}

/// Same idea for carousels; the API's historical sort field name is
/// `order`, stored as `display_order`.
fn carousel_sort_column(sort_field: Option<&str>) -> &'static str {
    match sort_field {
        Some("id") => "id",
        _ => "display_order",
    }
}

#[derive(Clone)]
pub struct CatalogService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl CatalogService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    fn check_page(page: i64, size: i64) -> CatalogResult<()> {
        if page < 0 || size <= 0 {
            return Err(CatalogError::InvalidPage);
        }
        Ok(())
    }

    // --- products ---

    pub async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&*self.db)
        .await?;
        Ok(products)
    }

    pub async fn get_product(&self, id: i64) -> CatalogResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => CatalogError::ProductNotFound(id),
            other => CatalogError::Sqlx(other),
        })
    }

    pub async fn add_product(&self, input: ProductInput) -> CatalogResult<i64> {
        let result = sqlx::query(
            "INSERT INTO products (name, description, price, stock, image_url, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .bind(Utc::now())
        .execute(&*self.db)
        .await?;

        let id = result.last_insert_rowid();
        debug!("inserted product {} ({})", id, input.name);
        Ok(id)
    }

    pub async fn update_product(&self, id: i64, input: ProductInput) -> CatalogResult<()> {
        let result = sqlx::query(
            "UPDATE products SET name = ?, description = ?, price = ?, stock = ?, image_url = ?
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .bind(id)
        .execute(&*self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound(id));
        }
        Ok(())
    }

    pub async fn delete_product(&self, id: i64) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound(id));
        }
        Ok(())
    }

    /// Page through products, returning the page plus the total row count.
    pub async fn products_paged(
        &self,
        page: i64,
        size: i64,
        sort_field: Option<&str>,
    ) -> CatalogResult<ProductPage> {
        Self::check_page(page, size)?;
        let column = product_sort_column(sort_field);

        let items = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {column} LIMIT ? OFFSET ?"
        ))
        .bind(size)
        .bind(page * size)
        .fetch_all(&*self.db)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&*self.db)
            .await?;

        Ok(ProductPage {
            items,
            total,
            page,
            size,
        })
    }

    /// Substring search on product names.
    pub async fn search_products(&self, name: &str) -> CatalogResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name LIKE ? ORDER BY id"
        ))
        .bind(format!("%{name}%"))
        .fetch_all(&*self.db)
        .await?;
        Ok(products)
    }

    // --- carousels ---

    pub async fn list_carousels(&self) -> CatalogResult<Vec<Carousel>> {
        let carousels = sqlx::query_as::<_, Carousel>(&format!(
            "SELECT {CAROUSEL_COLUMNS} FROM carousels ORDER BY display_order"
        ))
        .fetch_all(&*self.db)
        .await?;
        Ok(carousels)
    }

    pub async fn get_carousel(&self, id: i64) -> CatalogResult<Carousel> {
        sqlx::query_as::<_, Carousel>(&format!(
            "SELECT {CAROUSEL_COLUMNS} FROM carousels WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => CatalogError::CarouselNotFound(id),
            other => CatalogError::Sqlx(other),
        })
    }

    /// Insert a slide; the image URL must not already be registered.
    pub async fn add_carousel(&self, input: CarouselInput) -> CatalogResult<i64> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carousels WHERE image_url = ?")
            .bind(&input.image_url)
            .fetch_one(&*self.db)
            .await?;
        if existing > 0 {
            return Err(CatalogError::DuplicateImageUrl(input.image_url));
        }

        let result = sqlx::query(
            "INSERT INTO carousels (title, image_url, link_url, display_order, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(&input.link_url)
        .bind(input.display_order)
        .bind(Utc::now())
        .execute(&*self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CatalogError::DuplicateImageUrl(input.image_url.clone())
            } else {
                CatalogError::Sqlx(err)
            }
        })?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update_carousel(&self, id: i64, input: CarouselInput) -> CatalogResult<()> {
        let result = sqlx::query(
            "UPDATE carousels SET title = ?, image_url = ?, link_url = ?, display_order = ?
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(&input.link_url)
        .bind(input.display_order)
        .bind(id)
        .execute(&*self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::CarouselNotFound(id));
        }
        Ok(())
    }

    pub async fn delete_carousel(&self, id: i64) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM carousels WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::CarouselNotFound(id));
        }
        Ok(())
    }

    /// Page through slides. Defaults to display order, matching the
    /// carousel's on-screen arrangement.
    pub async fn carousels_paged(
        &self,
        page: i64,
        size: i64,
        sort_field: Option<&str>,
    ) -> CatalogResult<Vec<Carousel>> {
        Self::check_page(page, size)?;
        let column = carousel_sort_column(sort_field);

        let carousels = sqlx::query_as::<_, Carousel>(&format!(
            "SELECT {CAROUSEL_COLUMNS} FROM carousels ORDER BY {column} LIMIT ? OFFSET ?"
        ))
        .bind(size)
        .bind(page * size)
        .fetch_all(&*self.db)
        .await?;
        Ok(carousels)
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn service() -> CatalogService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        for stmt in [
            "CREATE TABLE products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL,
                stock INTEGER NOT NULL DEFAULT 0,
                image_url TEXT,
                created_at TIMESTAMP NOT NULL
            )",
            "CREATE TABLE carousels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                image_url TEXT NOT NULL UNIQUE,
                link_url TEXT,
                display_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL
            )",
        ] {
            sqlx::query(stmt).execute(&pool).await.unwrap();
        }

        CatalogService::new(Arc::new(pool))
    }

    fn product(name: &str, price: f64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: None,
            price,
            stock: 10,
            image_url: None,
        }
    }

    fn slide(image_url: &str, order: i64) -> CarouselInput {
        CarouselInput {
            title: Some("banner".into()),
            image_url: image_url.to_string(),
            link_url: None,
            display_order: order,
        }
    }

    #[tokio::test]
    async fn product_crud_roundtrip() {
        let svc = service().await;

        let id = svc.add_product(product("mug", 9.5)).await.unwrap();
        let fetched = svc.get_product(id).await.unwrap();
        assert_eq!(fetched.name, "mug");
        assert_eq!(fetched.stock, 10);

        svc.update_product(id, product("mug v2", 11.0)).await.unwrap();
        let updated = svc.get_product(id).await.unwrap();
        assert_eq!(updated.name, "mug v2");
        assert_eq!(updated.price, 11.0);

        svc.delete_product(id).await.unwrap();
        assert!(matches!(
            svc.get_product(id).await,
            Err(CatalogError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let svc = service().await;
        assert!(matches!(
            svc.update_product(99, product("x", 1.0)).await,
            Err(CatalogError::ProductNotFound(99))
        ));
        assert!(matches!(
            svc.delete_carousel(99).await,
            Err(CatalogError::CarouselNotFound(99))
        ));
    }

    #[tokio::test]
    async fn paging_reports_total_and_respects_sort() {
        let svc = service().await;
        for (name, price) in [("b", 2.0), ("a", 3.0), ("c", 1.0)] {
            svc.add_product(product(name, price)).await.unwrap();
        }

        let page = svc.products_paged(0, 2, Some("name")).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "a");

        let by_price = svc.products_paged(0, 3, Some("price")).await.unwrap();
        assert_eq!(by_price.items[0].name, "c");

        // unknown sort fields fall back to id order
        let fallback = svc.products_paged(0, 3, Some("name; DROP TABLE")).await.unwrap();
        assert_eq!(fallback.items[0].name, "b");
    }

    #[tokio::test]
    async fn invalid_page_parameters_are_rejected() {
        let svc = service().await;
        assert!(matches!(
            svc.products_paged(-1, 10, None).await,
            Err(CatalogError::InvalidPage)
        ));
        assert!(matches!(
            svc.carousels_paged(0, 0, None).await,
            Err(CatalogError::InvalidPage)
        ));
    }

    #[tokio::test]
    async fn search_matches_name_substring() {
        let svc = service().await;
        svc.add_product(product("coffee mug", 9.0)).await.unwrap();
        svc.add_product(product("tea pot", 19.0)).await.unwrap();

        let hits = svc.search_products("mug").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "coffee mug");
        assert!(svc.search_products("vase").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn carousel_image_urls_are_unique() {
        let svc = service().await;
        svc.add_carousel(slide("https://cdn/a.png", 1)).await.unwrap();

        assert!(matches!(
            svc.add_carousel(slide("https://cdn/a.png", 2)).await,
            Err(CatalogError::DuplicateImageUrl(_))
        ));
    }

    #[tokio::test]
    async fn carousels_order_by_display_order_by_default() {
        let svc = service().await;
        svc.add_carousel(slide("https://cdn/b.png", 2)).await.unwrap();
        svc.add_carousel(slide("https://cdn/a.png", 1)).await.unwrap();

        let slides = svc.carousels_paged(0, 10, None).await.unwrap();
        assert_eq!(slides[0].image_url, "https://cdn/a.png");

        let listed = svc.list_carousels().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].display_order, 1);
    }
}
