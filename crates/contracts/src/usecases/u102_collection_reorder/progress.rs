use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::usecases::common::{SessionError, SessionStatus};

/// Текущий прогресс перестроения коллекций
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderProgress {
    pub session_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Прогресс по каждой коллекции
    pub collections: Vec<CollectionRunProgress>,

    /// Общая статистика
    pub total_moves: i32,
    pub total_errors: i32,

    /// Ошибки выполнения
    pub errors: Vec<SessionError>,
}

/// Прогресс перестроения одной коллекции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRunProgress {
    pub collection_id: i64,
    pub title: String,
    pub status: CollectionRunStatus,
    /// Сколько перемещений выпущено
    pub moves_issued: i32,
    /// Сколько перемещений всего по плану
    pub moves_total: Option<i32>,
    pub errors: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionRunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ReorderProgress {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: SessionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
            collections: Vec::new(),
            total_moves: 0,
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
