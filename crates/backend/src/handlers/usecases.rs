use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::usecases::u101_stock_update;
use crate::usecases::u102_collection_reorder;
use contracts::usecases::u101_stock_update::progress::UpdateProgress;
use contracts::usecases::u101_stock_update::request::StockUpdateRequest;
use contracts::usecases::u101_stock_update::response::StockUpdateResponse;
use contracts::usecases::u102_collection_reorder::progress::ReorderProgress;
use contracts::usecases::u102_collection_reorder::request::ReorderRequest;
use contracts::usecases::u102_collection_reorder::response::ReorderResponse;

// Трекеры живут всё время работы процесса: прогресс сессии опрашивается
// и после того, как запустивший её запрос завершился
static STOCK_TRACKER: Lazy<Arc<u101_stock_update::progress_tracker::ProgressTracker>> =
    Lazy::new(|| Arc::new(u101_stock_update::progress_tracker::ProgressTracker::new()));

static REORDER_TRACKER: Lazy<Arc<u102_collection_reorder::progress_tracker::ProgressTracker>> =
    Lazy::new(|| Arc::new(u102_collection_reorder::progress_tracker::ProgressTracker::new()));

/// POST /api/u101/stock-update/start
pub async fn start_stock_update(
    Json(request): Json<StockUpdateRequest>,
) -> Result<Json<StockUpdateResponse>, StatusCode> {
    let executor = u101_stock_update::executor::StockUpdateExecutor::new(STOCK_TRACKER.clone())
        .map_err(|e| {
            tracing::error!("Failed to create stock update executor: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    match executor.start_update(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start stock update: {}", e);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// GET /api/u101/stock-update/:session_id/progress
pub async fn get_stock_update_progress(
    Path(session_id): Path<String>,
) -> Result<Json<UpdateProgress>, StatusCode> {
    STOCK_TRACKER
        .get_progress(&session_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/u101/stock-update/:session_id/cancel
pub async fn cancel_stock_update(Path(session_id): Path<String>) -> StatusCode {
    if STOCK_TRACKER.request_cancel(&session_id) {
        StatusCode::ACCEPTED
    } else {
        StatusCode::NOT_FOUND
    }
}

/// POST /api/u102/collection-reorder/start
pub async fn start_collection_reorder(
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>, StatusCode> {
    let executor =
        u102_collection_reorder::executor::ReorderExecutor::new(REORDER_TRACKER.clone()).map_err(
            |e| {
                tracing::error!("Failed to create reorder executor: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            },
        )?;

    match executor.start_reorder(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start collection reorder: {}", e);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// GET /api/u102/collection-reorder/:session_id/progress
pub async fn get_collection_reorder_progress(
    Path(session_id): Path<String>,
) -> Result<Json<ReorderProgress>, StatusCode> {
    REORDER_TRACKER
        .get_progress(&session_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/u102/collection-reorder/:session_id/cancel
pub async fn cancel_collection_reorder(Path(session_id): Path<String>) -> StatusCode {
    if REORDER_TRACKER.request_cancel(&session_id) {
        StatusCode::ACCEPTED
    } else {
        StatusCode::NOT_FOUND
    }
}
