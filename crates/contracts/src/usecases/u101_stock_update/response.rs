use serde::{Deserialize, Serialize};

use crate::usecases::common::StartStatus;

/// Ответ на запрос запуска обновления остатков
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdateResponse {
    /// Уникальный ID сессии
    pub session_id: String,

    /// Статус запуска
    pub status: StartStatus,

    /// Сообщение
    pub message: String,
}
