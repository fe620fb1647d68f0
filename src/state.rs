//! Shared application state handed to every handler.

use crate::services::{
    catalog_service::CatalogService, storage_service::StorageService, upload_service::UploadService,
};

/// Cheap to clone; each service wraps its own shared handles.
#[derive(Clone)]
pub struct AppState {
    pub storage: StorageService,
    pub catalog: CatalogService,
    pub uploads: UploadService,
}
