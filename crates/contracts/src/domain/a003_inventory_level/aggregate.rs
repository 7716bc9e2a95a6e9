use serde::{Deserialize, Serialize};

/// Последнее известное количество товара (локальный учёт остатков).
///
/// Обновляется после каждого успешного обновления остатка на витрине;
/// читается ранжировщиком коллекций для деления товаров на "в наличии" /
/// "нет в наличии". Записи никогда не удаляются.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub sku: String,
    /// ID товара на витрине
    pub id: i64,
    pub qty: i64,
}
