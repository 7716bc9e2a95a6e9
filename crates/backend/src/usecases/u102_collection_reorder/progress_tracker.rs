use contracts::usecases::common::SessionStatus;
use contracts::usecases::u102_collection_reorder::progress::{
    CollectionRunProgress, CollectionRunStatus, ReorderProgress,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Трекер прогресса перестроения коллекций (in-memory)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, ReorderProgress>>>,
    cancelled: Arc<RwLock<HashSet<String>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            cancelled: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Создать новую сессию перестроения
    pub fn create_session(&self, session_id: String) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), ReorderProgress::new(session_id));
    }

    /// Получить текущий прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<ReorderProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }

    /// Добавить коллекцию для отслеживания
    pub fn add_collection(&self, session_id: &str, collection_id: i64, title: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.collections.push(CollectionRunProgress {
                collection_id,
                title,
                status: CollectionRunStatus::Pending,
                moves_issued: 0,
                moves_total: None,
                errors: 0,
            });
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Отметить коллекцию как обрабатываемую и зафиксировать размер плана
    pub fn start_collection(&self, session_id: &str, collection_id: i64, moves_total: i32) {
        self.with_collection(session_id, collection_id, |run| {
            run.status = CollectionRunStatus::Running;
            run.moves_total = Some(moves_total);
        });
    }

    /// Обновить счётчик выпущенных перемещений
    pub fn update_moves(&self, session_id: &str, collection_id: i64, issued: i32, errors: i32) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(run) = progress
                .collections
                .iter_mut()
                .find(|c| c.collection_id == collection_id)
            {
                run.moves_issued = issued;
                run.errors = errors;
                progress.total_moves = progress.collections.iter().map(|c| c.moves_issued).sum();
                progress.updated_at = chrono::Utc::now();
            }
        }
    }

    /// Отметить коллекцию как завершенную
    pub fn complete_collection(&self, session_id: &str, collection_id: i64) {
        self.with_collection(session_id, collection_id, |run| {
            run.status = CollectionRunStatus::Completed;
        });
    }

    /// Отметить коллекцию как проваленную
    pub fn fail_collection(&self, session_id: &str, collection_id: i64, error: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(run) = progress
                .collections
                .iter_mut()
                .find(|c| c.collection_id == collection_id)
            {
                run.status = CollectionRunStatus::Failed;
                run.errors += 1;
            }
            progress.add_error(Some(collection_id.to_string()), error, None);
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Добавить ошибку
    pub fn add_error(
        &self,
        session_id: &str,
        unit: Option<String>,
        message: String,
        details: Option<String>,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.add_error(unit, message, details);
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Запросить отмену сессии
    pub fn request_cancel(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().unwrap();
        match sessions.get(session_id) {
            Some(progress) if progress.status == SessionStatus::Running => {
                self.cancelled
                    .write()
                    .unwrap()
                    .insert(session_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Проверка флага отмены (между коллекциями и перемещениями)
    pub fn is_cancelled(&self, session_id: &str) -> bool {
        self.cancelled.read().unwrap().contains(session_id)
    }

    /// Завершить сессию перестроения
    pub fn complete_session(&self, session_id: &str, status: SessionStatus) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.status = status;
            progress.completed_at = Some(chrono::Utc::now());
            progress.updated_at = chrono::Utc::now();
        }
        self.cancelled.write().unwrap().remove(session_id);
    }

    /// Удалить старые сессии (для очистки памяти)
    pub fn cleanup_old_sessions(&self, max_age_hours: i64) {
        let mut sessions = self.sessions.write().unwrap();
        let now = chrono::Utc::now();
        sessions.retain(|_, progress| {
            if let Some(completed_at) = progress.completed_at {
                (now - completed_at).num_hours() < max_age_hours
            } else {
                true
            }
        });
    }

    fn with_collection<F>(&self, session_id: &str, collection_id: i64, apply: F)
    where
        F: FnOnce(&mut CollectionRunProgress),
    {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(run) = progress
                .collections
                .iter_mut()
                .find(|c| c.collection_id == collection_id)
            {
                apply(run);
                progress.updated_at = chrono::Utc::now();
            }
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
