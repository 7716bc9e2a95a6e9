use chrono::Utc;
use contracts::shared::logger::LogEntry;
use once_cell::sync::Lazy;
use std::sync::RwLock;

/// Поток логов, видимый пользователю: только добавление, чтение целиком,
/// явная очистка. Держится в памяти процесса.
struct LogStream {
    next_id: i64,
    entries: Vec<LogEntry>,
}

static LOG_STREAM: Lazy<RwLock<LogStream>> = Lazy::new(|| {
    RwLock::new(LogStream {
        next_id: 1,
        entries: Vec::new(),
    })
});

/// Добавить запись в лог (внутренняя функция)
pub fn log_event_internal(source: &str, category: &str, message: &str) {
    if let Err(e) = log_event(source, category, message) {
        eprintln!("Failed to log event: {}", e);
    }
}

/// Добавить запись в лог
pub fn log_event(source: &str, category: &str, message: &str) -> anyhow::Result<()> {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

    let mut stream = LOG_STREAM
        .write()
        .map_err(|_| anyhow::anyhow!("log stream lock poisoned"))?;
    let id = stream.next_id;
    stream.next_id += 1;
    stream.entries.push(LogEntry {
        id,
        timestamp: now,
        source: source.to_string(),
        category: category.to_string(),
        message: message.to_string(),
    });

    tracing::debug!("[{}/{}] {}", source, category, message);
    Ok(())
}

/// Получить все записи лога (сортировка по времени, новые сверху)
pub fn get_all_logs() -> anyhow::Result<Vec<LogEntry>> {
    let stream = LOG_STREAM
        .read()
        .map_err(|_| anyhow::anyhow!("log stream lock poisoned"))?;
    let mut logs = stream.entries.clone();
    logs.reverse();
    Ok(logs)
}

/// Очистить все записи лога
pub fn clear_all_logs() -> anyhow::Result<()> {
    let mut stream = LOG_STREAM
        .write()
        .map_err(|_| anyhow::anyhow!("log stream lock poisoned"))?;
    stream.entries.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_appends_and_clears() {
        clear_all_logs().unwrap();
        log_event("server", "test", "первое").unwrap();
        log_event("server", "test", "второе").unwrap();

        let logs = get_all_logs().unwrap();
        assert!(logs.len() >= 2);
        // Новые записи сверху
        assert_eq!(logs[0].message, "второе");
        assert_eq!(logs[1].message, "первое");
        assert!(logs[0].id > logs[1].id);

        clear_all_logs().unwrap();
        assert!(get_all_logs().unwrap().is_empty());
    }
}
