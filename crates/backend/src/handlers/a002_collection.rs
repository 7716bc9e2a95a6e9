use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_collection::aggregate::{Collection, CollectionUploadResult};

use crate::domain::a002_collection::{repository, service};

/// POST /api/collections/upload — загрузка CSV-выгрузки коллекций
pub async fn upload(body: String) -> Result<Json<CollectionUploadResult>, StatusCode> {
    match service::import_csv(&body).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("Collections upload failed: {}", e);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// GET /api/collections — список для выбора цели перестроения
pub async fn list_all() -> Result<Json<Vec<Collection>>, StatusCode> {
    match repository::get_all() {
        Ok(collections) => Ok(Json(collections)),
        Err(e) => {
            tracing::error!("Failed to read collections: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
