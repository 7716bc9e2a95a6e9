use serde::{Deserialize, Serialize};

use crate::usecases::common::StartStatus;

/// Ответ на запрос перестроения коллекций
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    /// Уникальный ID сессии
    pub session_id: String,

    /// Статус запуска
    pub status: StartStatus,

    /// Сообщение
    pub message: String,
}
