use super::repository;
use contracts::domain::a003_inventory_level::aggregate::InventoryRecord;
use std::collections::HashMap;

/// Зафиксировать последний известный остаток после успешного обновления
/// на витрине
pub async fn record_quantity(sku: &str, product_id: i64, qty: i64) -> anyhow::Result<()> {
    repository::upsert(sku, product_id, qty).await
}

/// Индекс остатков: ID товара → последний известный остаток
pub fn quantity_index() -> anyhow::Result<HashMap<i64, i64>> {
    let records = repository::get_all()?;
    Ok(build_quantity_index(&records))
}

fn build_quantity_index(records: &[InventoryRecord]) -> HashMap<i64, i64> {
    records.iter().map(|r| (r.id, r.qty)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_quantity_index() {
        let records = vec![
            InventoryRecord {
                sku: "SKU-A".into(),
                id: 1,
                qty: 5,
            },
            InventoryRecord {
                sku: "SKU-B".into(),
                id: 2,
                qty: 0,
            },
        ];
        let index = build_quantity_index(&records);
        assert_eq!(index.get(&1), Some(&5));
        assert_eq!(index.get(&2), Some(&0));
        assert_eq!(index.get(&3), None);
    }
}
