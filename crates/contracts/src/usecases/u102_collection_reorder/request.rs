use serde::{Deserialize, Serialize};

/// Запрос на перестроение порядка товаров в коллекции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub target: ReorderTarget,
}

/// Цель перестроения: одна коллекция или все опубликованные
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderTarget {
    /// Все опубликованные коллекции из collections.json, по очереди
    All,
    /// Одна коллекция по ID
    Collection { id: i64 },
}
