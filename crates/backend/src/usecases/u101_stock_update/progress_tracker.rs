use contracts::usecases::common::SessionStatus;
use contracts::usecases::u101_stock_update::progress::{SheetProgress, SheetStatus, UpdateProgress};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Трекер прогресса обновления остатков (in-memory, для real-time мониторинга)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, UpdateProgress>>>,
    cancelled: Arc<RwLock<HashSet<String>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            cancelled: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Создать новую сессию обновления
    pub fn create_session(&self, session_id: String) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), UpdateProgress::new(session_id));
    }

    /// Получить текущий прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<UpdateProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }

    /// Добавить лист книги для отслеживания
    pub fn add_sheet(&self, session_id: &str, sheet_name: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.sheets.push(SheetProgress {
                sheet_name,
                status: SheetStatus::Pending,
                rows: 0,
                updated: 0,
                skipped: 0,
                drafted: 0,
                errors: 0,
                current_item: None,
            });
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Отметить лист как обрабатываемый
    pub fn start_sheet(&self, session_id: &str, sheet_name: &str) {
        self.with_sheet(session_id, sheet_name, |sheet| {
            sheet.status = SheetStatus::Running;
        });
    }

    /// Обновить счётчики листа
    pub fn update_sheet(
        &self,
        session_id: &str,
        sheet_name: &str,
        rows: i32,
        updated: i32,
        skipped: i32,
        drafted: i32,
        errors: i32,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(sheet) = progress
                .sheets
                .iter_mut()
                .find(|s| s.sheet_name == sheet_name)
            {
                sheet.rows = rows;
                sheet.updated = updated;
                sheet.skipped = skipped;
                sheet.drafted = drafted;
                sheet.errors = errors;

                // Обновить общую статистику
                progress.total_rows = progress.sheets.iter().map(|s| s.rows).sum();
                progress.total_updated = progress.sheets.iter().map(|s| s.updated).sum();
                progress.total_skipped = progress.sheets.iter().map(|s| s.skipped).sum();
                progress.total_drafted = progress.sheets.iter().map(|s| s.drafted).sum();
                progress.updated_at = chrono::Utc::now();
            }
        }
    }

    /// Установить текущий обрабатываемый SKU
    pub fn set_current_item(&self, session_id: &str, sheet_name: &str, label: Option<String>) {
        self.with_sheet(session_id, sheet_name, |sheet| {
            sheet.current_item = label;
        });
    }

    /// Отметить лист как завершенный
    pub fn complete_sheet(&self, session_id: &str, sheet_name: &str) {
        self.with_sheet(session_id, sheet_name, |sheet| {
            sheet.status = SheetStatus::Completed;
            sheet.current_item = None;
        });
    }

    /// Отметить лист как проваленный
    pub fn fail_sheet(&self, session_id: &str, sheet_name: &str, error: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(sheet) = progress
                .sheets
                .iter_mut()
                .find(|s| s.sheet_name == sheet_name)
            {
                sheet.status = SheetStatus::Failed;
                sheet.errors += 1;
            }
            progress.add_error(Some(sheet_name.to_string()), error, None);
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

    /// Запросить отмену сессии. Возвращает false, если сессия неизвестна
    /// или уже завершена.
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

    /// Проверка флага отмены (вызывается между строками/листами)
    pub fn is_cancelled(&self, session_id: &str) -> bool {
        self.cancelled.read().unwrap().contains(session_id)
    }

    /// Завершить сессию обновления
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
                true // Не удаляем активные сессии
            }
        });
    }

    fn with_sheet<F>(&self, session_id: &str, sheet_name: &str, apply: F)
    where
        F: FnOnce(&mut SheetProgress),
    {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(sheet) = progress
                .sheets
                .iter_mut()
                .find(|s| s.sheet_name == sheet_name)
            {
                apply(sheet);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_only_running_sessions() {
        let tracker = ProgressTracker::new();
        tracker.create_session("s1".to_string());

        assert!(!tracker.request_cancel("unknown"));
        assert!(tracker.request_cancel("s1"));
        assert!(tracker.is_cancelled("s1"));

        tracker.complete_session("s1", SessionStatus::Cancelled);
        assert!(!tracker.is_cancelled("s1"));
        assert!(!tracker.request_cancel("s1"));
    }

    #[test]
    fn test_sheet_totals_roll_up() {
        let tracker = ProgressTracker::new();
        tracker.create_session("s1".to_string());
        tracker.add_sheet("s1", "A".to_string());
        tracker.add_sheet("s1", "B".to_string());

        tracker.update_sheet("s1", "A", 10, 4, 5, 1, 0);
        tracker.update_sheet("s1", "B", 7, 2, 5, 0, 0);

        let progress = tracker.get_progress("s1").unwrap();
        assert_eq!(progress.total_rows, 17);
        assert_eq!(progress.total_updated, 6);
        assert_eq!(progress.total_skipped, 10);
        assert_eq!(progress.total_drafted, 1);
    }
}
