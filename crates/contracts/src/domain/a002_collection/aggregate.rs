use serde::{Deserialize, Serialize};

/// Коллекция витрины (кураторская подборка товаров).
///
/// Метаданные приходят из выгрузки платформы и используются для выбора
/// коллекции при перестроении порядка товаров.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub handle: String,
    pub title: String,
    /// Опубликована ли коллекция на витрине
    pub published: bool,
}

/// Результат загрузки списка коллекций
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionUploadResult {
    pub imported: usize,
    pub skipped: usize,
}
