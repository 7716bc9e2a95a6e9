use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Статус фоновой сессии (обновление остатков, перестроение коллекций)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Выполняется
    Running,

    /// Завершена успешно
    Completed,

    /// Завершена, но часть единиц работы провалилась
    CompletedWithErrors,

    /// Провалена целиком
    Failed,

    /// Отменена пользователем
    Cancelled,
}

/// Статус запуска фоновой сессии
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartStatus {
    /// Сессия успешно запущена
    Started,

    /// Ошибка при запуске
    Failed,
}

/// Ошибка одной единицы работы (строки ведомости, перемещения товара).
///
/// Ошибка единицы не прерывает сессию — она копится здесь и в логе.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionError {
    pub unit: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub occurred_at: DateTime<Utc>,
}
