//! Defines routes for the object-storage façade, file upload, and catalog
//! CRUD surfaces.
//!
//! ## Structure
//! - **Object-storage façade** (`/v1/osss/*`)
//!   - `GET  /getAllOsss` — absolute URLs of every object
//!   - `GET  /getOsssByPrefix` — absolute URLs under a prefix
//!   - `GET  /generatePreviewUrl` — presigned inline URL, caller expiry
//!   - `GET  /generateDefaultPreviewUrl` — presigned inline URL, 1 hour
//!   - `POST /batchGeneratePreviewUrls` — per-key URLs, same order
//!   - `POST /setInlineContentDisposition` — metadata rewrite
//!   - `GET  /getOssInfoByKey` — metadata record
//!
//! - **File upload** (`/v1/fileUpload/*`)
//!   - `POST /upload` — multipart, returns storage name
//!   - `GET  /getDisplayName` — storage name -> original name
//!
//! - **Catalog** (`/v1/products/*`, `/v1/carousels/*`) — plain CRUD.

use crate::{
    handlers::{
        catalog_handlers::{
            add_carousel, add_product, delete_carousel, delete_product, get_carousel, get_product,
            list_carousels, list_carousels_paged, list_products, list_products_paged,
            search_products, update_carousel, update_product,
        },
        health_handlers::{healthz, readyz},
        oss_handlers::{
            batch_generate_preview_urls, generate_default_preview_url, generate_preview_url,
            get_all_osss, get_oss_info_by_key, get_osss_by_prefix, set_inline_content_disposition,
        },
        upload_handlers::{get_display_name, upload_file},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Upload bodies carry at most a 5 MiB file plus multipart framing; the
/// service enforces the file limit itself with a clearer message.
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Build and return the router for every surface.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // object-storage façade
        .route("/v1/osss/getAllOsss", get(get_all_osss))
        .route("/v1/osss/getOsssByPrefix", get(get_osss_by_prefix))
        .route("/v1/osss/generatePreviewUrl", get(generate_preview_url))
        .route(
            "/v1/osss/generateDefaultPreviewUrl",
            get(generate_default_preview_url),
        )
        .route(
            "/v1/osss/batchGeneratePreviewUrls",
            post(batch_generate_preview_urls),
        )
        .route(
            "/v1/osss/setInlineContentDisposition",
            post(set_inline_content_disposition),
        )
        .route("/v1/osss/getOssInfoByKey", get(get_oss_info_by_key))
        // file upload
        .route(
            "/v1/fileUpload/upload",
            post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/v1/fileUpload/getDisplayName", get(get_display_name))
        // catalog: products
        .route("/v1/products", get(list_products_paged).post(add_product))
        .route("/v1/products/all", get(list_products))
        .route("/v1/products/search", get(search_products))
        .route(
            "/v1/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        // catalog: carousels
        .route("/v1/carousels", get(list_carousels_paged).post(add_carousel))
        .route("/v1/carousels/all", get(list_carousels))
        .route(
            "/v1/carousels/{id}",
            get(get_carousel).put(update_carousel).delete(delete_carousel),
        )
}
