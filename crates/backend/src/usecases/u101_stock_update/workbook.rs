use chrono::NaiveDate;
use contracts::domain::a001_catalog_product::aggregate::CatalogProduct;
use contracts::usecases::u101_stock_update::request::{CellValue, WorkSheet};
use std::collections::HashMap;

/// Разбор стоковой ведомости поставщика.
///
/// Ведомость ведётся вручную и имеет фиксированный, но нетабличный
/// макет: три строки шапки, колонка SKU ищется по подписи, даты
/// пересчётов закодированы серийными номерами в шапке, количество
/// берётся позиционно из последних заполненных ячеек строки. Правила
/// ниже воспроизводят этот макет один в один — менять их нельзя без
/// согласования формы ведомости с поставщиком.

/// Рабочая строка шапки (0-based)
const HEADER_ROW_IDX: usize = 2;
/// Первая строка данных
const DATA_START_IDX: usize = 3;
/// Колонка SKU по умолчанию, если подпись не найдена
const DEFAULT_SKU_COL: usize = 2;
/// Подпись колонки SKU в шапке
const SKU_HEADER_LABEL: &str = "Product No";
/// Серийный номер дня 1970-01-01 в эпохе таблиц (1899-12-30)
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
/// Окно свежести пересчёта
const FRESHNESS_WINDOW_DAYS: i64 = 90;
/// Возраст строки без даты пересчёта: заведомо за окном свежести
const STALE_DAY_DIFF: i64 = 9999;
/// Литерал "OK" в ячейке количества означает "в наличии, примерно 50"
const OK_QUANTITY: i64 = 50;
/// Пометка в первой колонке: товар выводится из ассортимента
const DISCONTINUED_LABEL: &str = "Discontinued";

/// Команда обновления остатка, готовая к отправке на витрину
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryCommand {
    pub sku: String,
    pub product_id: i64,
    pub inventory_item_id: i64,
    pub quantity: i64,
    /// Перевести товар в черновики после обнуления остатка
    pub requested_draft: bool,
}

/// Причина пропуска строки. Пропуск — не ошибка: ведомость заполняется
/// частично, и такие строки просто не дают команды.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// В колонке SKU пусто
    NoSku,
    /// Не удалось определить количество из последних ячеек
    QuantityUndetermined { sku: String },
    /// SKU нет в каталоге
    UnknownSku { sku: String },
    /// Пересчёт старше окна свежести
    Stale { sku: String, days: i64 },
}

/// Результат разбора одной строки данных
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Command(InventoryCommand),
    Skip(SkipReason),
}

/// Разобранная шапка листа
#[derive(Debug, Clone)]
pub struct SheetHeader {
    /// Индекс колонки SKU
    pub sku_col: usize,
    /// Даты пересчёта по индексу колонки (из серийных номеров в шапке)
    pub count_dates: HashMap<usize, NaiveDate>,
}

/// Перевести серийный номер дня в календарную дату
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let secs = ((serial - UNIX_EPOCH_SERIAL) * 86_400.0).round() as i64;
    chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Разобрать шапку листа: найти колонку SKU и даты пересчёта.
///
/// Если рабочей строки шапки нет (лист короче трёх строк), действует
/// колонка SKU по умолчанию, а все строки считаются без даты пересчёта.
pub fn scan_header(sheet: &WorkSheet) -> SheetHeader {
    let mut header = SheetHeader {
        sku_col: DEFAULT_SKU_COL,
        count_dates: HashMap::new(),
    };

    let Some(header_row) = sheet.rows.get(HEADER_ROW_IDX) else {
        return header;
    };

    for (idx, cell) in header_row.iter().enumerate() {
        match cell {
            CellValue::Text(s) if s.trim() == SKU_HEADER_LABEL => {
                header.sku_col = idx;
            }
            CellValue::Number(n) => {
                if let Some(date) = serial_to_date(*n) {
                    header.count_dates.insert(idx, date);
                }
            }
            _ => {}
        }
    }

    header
}

/// Номер первой строки данных
pub fn data_start_idx() -> usize {
    DATA_START_IDX
}

/// Вытащить ведущие цифры из текста ("12 units" → 12)
fn parse_leading_digits(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Привести значение ячейки к количеству. Отрицательные числа
/// считаются неопределённым количеством: команда несёт остаток >= 0.
fn coerce_quantity(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(n) => {
            let qty = n.round() as i64;
            (qty >= 0).then_some(qty)
        }
        CellValue::Text(s) if s.trim() == "OK" => Some(OK_QUANTITY),
        CellValue::Text(s) => parse_leading_digits(s),
        CellValue::Empty => None,
    }
}

/// Определить количество и колонку, по которой берётся дата пересчёта.
///
/// Правило позиционное: смотрим заполненные ячейки строки слева направо.
/// Если последняя текстовая, количество берётся из неё ("OK" → 50, иначе
/// ведущие цифры). Если последняя числовая, количеством считается
/// предпоследнее значение. Колонка даты — колонка значения, из которого
/// взято количество.
fn determine_quantity(row: &[CellValue]) -> Option<(i64, usize)> {
    let values: Vec<(usize, &CellValue)> = row
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_empty())
        .collect();

    let (last_idx, last) = *values.last()?;

    match last {
        CellValue::Text(_) => coerce_quantity(last).map(|q| (q, last_idx)),
        _ => {
            let (prev_idx, prev) = *values.get(values.len().checked_sub(2)?)?;
            coerce_quantity(prev).map(|q| (q, prev_idx))
        }
    }
}

/// Прочитать SKU из ячейки (числовые SKU приводятся к строке)
fn cell_sku(cell: Option<&CellValue>) -> Option<String> {
    match cell? {
        CellValue::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        CellValue::Number(n) => {
            if n.fract() == 0.0 {
                Some(format!("{}", *n as i64))
            } else {
                Some(format!("{}", n))
            }
        }
        CellValue::Empty => None,
    }
}

/// Разобрать одну строку данных по правилам ведомости
pub fn reconcile_row(
    row: &[CellValue],
    header: &SheetHeader,
    catalog: &HashMap<String, CatalogProduct>,
    today: NaiveDate,
) -> RowOutcome {
    let Some(sku) = cell_sku(row.get(header.sku_col)) else {
        return RowOutcome::Skip(SkipReason::NoSku);
    };

    let Some((quantity, date_col)) = determine_quantity(row) else {
        return RowOutcome::Skip(SkipReason::QuantityUndetermined { sku });
    };

    let days = match header.count_dates.get(&date_col) {
        Some(date) => (today - *date).num_days(),
        None => STALE_DAY_DIFF,
    };
    if days >= FRESHNESS_WINDOW_DAYS {
        return RowOutcome::Skip(SkipReason::Stale { sku, days });
    }

    let Some(entry) = catalog.get(&sku) else {
        return RowOutcome::Skip(SkipReason::UnknownSku { sku });
    };

    let discontinued = row
        .first()
        .and_then(|c| c.as_text())
        .map(|s| s.trim() == DISCONTINUED_LABEL)
        .unwrap_or(false);

    RowOutcome::Command(InventoryCommand {
        sku,
        product_id: entry.product_id,
        inventory_item_id: entry.inventory_item_id,
        quantity,
        requested_draft: discontinued && quantity == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn catalog_with(sku: &str) -> HashMap<String, CatalogProduct> {
        let mut catalog = HashMap::new();
        catalog.insert(
            sku.to_string(),
            CatalogProduct {
                sku: sku.to_string(),
                product_id: 100,
                inventory_item_id: 200,
                variant_id: 300,
            },
        );
        catalog
    }

    fn serial_for(date: NaiveDate) -> f64 {
        let unix_days = (date - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days();
        unix_days as f64 + 25569.0
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Шапка с датой пересчёта в колонке 4, SKU в колонке 2 (по умолчанию)
    fn header_with_date(days_ago: i64) -> SheetHeader {
        let mut count_dates = HashMap::new();
        count_dates.insert(4, today() - chrono::Duration::days(days_ago));
        SheetHeader {
            sku_col: 2,
            count_dates,
        }
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(
            serial_to_date(25569.0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_scan_header_finds_sku_column_and_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let sheet = WorkSheet {
            name: "Sheet1".into(),
            rows: vec![
                vec![text("Stock count")],
                vec![],
                vec![
                    text("Status"),
                    text("Name"),
                    text("Product No"),
                    CellValue::Empty,
                    num(serial_for(date)),
                ],
            ],
        };

        let header = scan_header(&sheet);
        assert_eq!(header.sku_col, 2);
        assert_eq!(header.count_dates.get(&4), Some(&date));
    }

    #[test]
    fn test_scan_header_defaults_without_label() {
        let sheet = WorkSheet {
            name: "Sheet1".into(),
            rows: vec![vec![], vec![], vec![text("A"), text("B")]],
        };
        assert_eq!(scan_header(&sheet).sku_col, 2);

        // Лист короче трёх строк: шапки нет вовсе
        let short = WorkSheet {
            name: "Sheet2".into(),
            rows: vec![vec![text("A")]],
        };
        let header = scan_header(&short);
        assert_eq!(header.sku_col, 2);
        assert!(header.count_dates.is_empty());
    }

    #[test]
    fn test_quantity_last_text_with_digits() {
        // [..., 7, "12 units"] → ведущие цифры последнего значения
        let header = header_with_date(10);
        let row = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("SKU-1"),
            num(7.0),
            text("12 units"),
        ];
        match reconcile_row(&row, &header, &catalog_with("SKU-1"), today()) {
            RowOutcome::Command(cmd) => assert_eq!(cmd.quantity, 12),
            other => panic!("Expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_quantity_ok_literal_maps_to_50() {
        // [..., 7, "OK"] → литерал "OK" означает 50
        let header = header_with_date(10);
        let row = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("SKU-1"),
            num(7.0),
            text("OK"),
        ];
        match reconcile_row(&row, &header, &catalog_with("SKU-1"), today()) {
            RowOutcome::Command(cmd) => assert_eq!(cmd.quantity, 50),
            other => panic!("Expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_quantity_last_numeric_takes_second_to_last() {
        // Последнее значение числовое → количество из предпоследнего
        let header = header_with_date(10);
        let row = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("SKU-1"),
            num(5.0),
            num(7.0),
        ];
        match reconcile_row(&row, &header, &catalog_with("SKU-1"), today()) {
            RowOutcome::Command(cmd) => assert_eq!(cmd.quantity, 5),
            other => panic!("Expected command, got {:?}", other),
        }

        // Предпоследнее значение "OK" тоже приводится к 50
        let row = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("SKU-1"),
            text("OK"),
            num(7.0),
        ];
        match reconcile_row(&row, &header, &catalog_with("SKU-1"), today()) {
            RowOutcome::Command(cmd) => assert_eq!(cmd.quantity, 50),
            other => panic!("Expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_quantity_undetermined() {
        let header = header_with_date(10);
        // Текст без цифр
        let row = vec![CellValue::Empty, CellValue::Empty, text("SKU-1"), text("none left")];
        assert_eq!(
            reconcile_row(&row, &header, &catalog_with("SKU-1"), today()),
            RowOutcome::Skip(SkipReason::QuantityUndetermined {
                sku: "SKU-1".into()
            })
        );

        // Отрицательное число не становится остатком
        let row = vec![CellValue::Empty, CellValue::Empty, text("SKU-1"), num(-4.0), num(7.0)];
        assert_eq!(
            reconcile_row(&row, &header, &catalog_with("SKU-1"), today()),
            RowOutcome::Skip(SkipReason::QuantityUndetermined {
                sku: "SKU-1".into()
            })
        );
    }

    #[test]
    fn test_freshness_gate_blocks_stale_rows() {
        // Пересчёт 90 дней назад и старше не даёт команды
        let catalog = catalog_with("SKU-1");
        let row = |v: f64| {
            vec![
                CellValue::Empty,
                CellValue::Empty,
                text("SKU-1"),
                num(3.0),
                num(v),
            ]
        };

        let fresh = reconcile_row(&row(7.0), &header_with_date(89), &catalog, today());
        assert!(matches!(fresh, RowOutcome::Command(_)));

        let stale = reconcile_row(&row(7.0), &header_with_date(90), &catalog, today());
        assert_eq!(
            stale,
            RowOutcome::Skip(SkipReason::Stale {
                sku: "SKU-1".into(),
                days: 90
            })
        );
    }

    #[test]
    fn test_missing_header_date_is_treated_as_stale() {
        let header = SheetHeader {
            sku_col: 2,
            count_dates: HashMap::new(),
        };
        let row = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("SKU-1"),
            num(3.0),
            num(7.0),
        ];
        assert_eq!(
            reconcile_row(&row, &header, &catalog_with("SKU-1"), today()),
            RowOutcome::Skip(SkipReason::Stale {
                sku: "SKU-1".into(),
                days: 9999
            })
        );
    }

    #[test]
    fn test_row_without_sku_is_inert() {
        let header = header_with_date(10);
        let row = vec![CellValue::Empty, text("Some note"), CellValue::Empty, num(3.0), num(7.0)];
        assert_eq!(
            reconcile_row(&row, &header, &catalog_with("SKU-1"), today()),
            RowOutcome::Skip(SkipReason::NoSku)
        );
    }

    #[test]
    fn test_unknown_sku_is_skipped() {
        let header = header_with_date(10);
        let row = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("SKU-MISSING"),
            num(3.0),
            num(7.0),
        ];
        assert_eq!(
            reconcile_row(&row, &header, &catalog_with("SKU-1"), today()),
            RowOutcome::Skip(SkipReason::UnknownSku {
                sku: "SKU-MISSING".into()
            })
        );
    }

    #[test]
    fn test_discontinued_with_zero_quantity_requests_draft() {
        let header = header_with_date(10);
        let catalog = catalog_with("SKU-1");

        let row = vec![
            text("Discontinued"),
            CellValue::Empty,
            text("SKU-1"),
            num(0.0),
            num(7.0),
        ];
        match reconcile_row(&row, &header, &catalog, today()) {
            RowOutcome::Command(cmd) => {
                assert_eq!(cmd.quantity, 0);
                assert!(cmd.requested_draft);
            }
            other => panic!("Expected command, got {:?}", other),
        }

        // Ненулевой остаток не переводит товар в черновики
        let row = vec![
            text("Discontinued"),
            CellValue::Empty,
            text("SKU-1"),
            num(4.0),
            num(7.0),
        ];
        match reconcile_row(&row, &header, &catalog, today()) {
            RowOutcome::Command(cmd) => assert!(!cmd.requested_draft),
            other => panic!("Expected command, got {:?}", other),
        }
    }
}
