use serde::{Deserialize, Serialize};

/// Запись каталога: связка SKU поставщика с идентификаторами витрины.
///
/// Каталог загружается целиком из выгрузки платформы (CSV) и заменяется
/// полностью при каждой загрузке — инкрементального слияния нет.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// SKU поставщика (ключ связки со стоковой ведомостью)
    pub sku: String,
    /// ID товара на витрине
    pub product_id: i64,
    /// ID инвентарной позиции варианта
    pub inventory_item_id: i64,
    /// ID варианта
    pub variant_id: i64,
}

/// Результат загрузки каталога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogUploadResult {
    /// Сколько записей принято
    pub imported: usize,
    /// Строки, пропущенные из-за пустого SKU или битых идентификаторов
    pub skipped: usize,
}
