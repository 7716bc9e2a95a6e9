use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::usecases::common::{SessionError, SessionStatus};

/// Текущий прогресс обновления остатков (для real-time мониторинга)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgress {
    pub session_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Последнее обновление прогресса
    pub updated_at: DateTime<Utc>,

    /// Прогресс по каждому листу книги
    pub sheets: Vec<SheetProgress>,

    /// Общая статистика
    pub total_rows: i32,
    pub total_updated: i32,
    pub total_skipped: i32,
    pub total_drafted: i32,
    pub total_errors: i32,

    /// Ошибки выполнения
    pub errors: Vec<SessionError>,
}

/// Прогресс обработки одного листа
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetProgress {
    pub sheet_name: String,
    pub status: SheetStatus,
    pub rows: i32,
    pub updated: i32,
    pub skipped: i32,
    pub drafted: i32,
    pub errors: i32,
    /// SKU, обрабатываемый в данный момент
    pub current_item: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl UpdateProgress {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: SessionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
            sheets: Vec::new(),
            total_rows: 0,
            total_updated: 0,
            total_skipped: 0,
            total_drafted: 0,
            total_errors: 0,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, unit: Option<String>, message: String, details: Option<String>) {
        self.errors.push(SessionError {
            unit,
            message,
            details,
            occurred_at: Utc::now(),
        });
        self.total_errors += 1;
    }
}
