use serde::{Deserialize, Serialize};

/// Запрос на запуск обновления остатков.
///
/// Клиент разбирает бинарный xlsx у себя и присылает книгу уже в виде
/// типизированной JSON-сетки (как Excel-импорт у номенклатуры).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdateRequest {
    pub workbook: Workbook,
}

/// Стоковая книга: упорядоченный список листов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<WorkSheet>,
}

/// Один лист книги: имя и плотная сетка ячеек.
///
/// Индекс ячейки в строке — это номер колонки; пустые ячейки передаются
/// как null, чтобы позиции колонок сохранялись.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

/// Типизированная ячейка листа.
///
/// Даты приходят числами — серийный номер дня относительно эпохи
/// 1899-12-30 (одна единица = 86 400 секунд), конвертация на бэкенде.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}
