use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_catalog_product::aggregate::{CatalogProduct, CatalogUploadResult};

use crate::domain::a001_catalog_product::{repository, service};

/// POST /api/catalog/upload — загрузка CSV-выгрузки каталога
pub async fn upload(body: String) -> Result<Json<CatalogUploadResult>, StatusCode> {
    match service::import_csv(&body).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("Catalog upload failed: {}", e);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// GET /api/catalog
pub async fn list_all() -> Result<Json<Vec<CatalogProduct>>, StatusCode> {
    match repository::get_all() {
        Ok(products) => Ok(Json(products)),
        Err(e) => {
            tracing::error!("Failed to read catalog: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
