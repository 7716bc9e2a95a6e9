pub mod repository;

use self::repository::log_event_internal;

/// Логирование события на сервере
///
/// Событие попадает в поток логов, который опрашивает клиент
/// (`GET /api/logs`), и дублируется в tracing.
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message);
}
