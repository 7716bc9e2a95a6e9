use crate::shared::config;
use crate::shared::data::doc_store;
use contracts::domain::a003_inventory_level::aggregate::InventoryRecord;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

const DOC_NAME: &str = "inventory";

// Единственный писатель на документ inventory.json. Upsert читает и
// переписывает документ целиком, поэтому блокировка держится на всю
// операцию, а не только на запись.
static WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Прочитать локальный учёт остатков целиком
pub fn get_all() -> anyhow::Result<Vec<InventoryRecord>> {
    let dir = config::get_data_dir(config::get())?;
    doc_store::load_or_default(&dir, DOC_NAME)
}

/// Обновить или добавить запись остатка по ID товара
pub async fn upsert(sku: &str, product_id: i64, qty: i64) -> anyhow::Result<()> {
    let _guard = WRITE_LOCK.lock().await;
    let dir = config::get_data_dir(config::get())?;

    let mut records: Vec<InventoryRecord> = doc_store::load_or_default(&dir, DOC_NAME)?;
    match records.iter_mut().find(|r| r.id == product_id) {
        Some(record) => {
            record.sku = sku.to_string();
            record.qty = qty;
        }
        None => records.push(InventoryRecord {
            sku: sku.to_string(),
            id: product_id,
            qty,
        }),
    }

    doc_store::save(&dir, DOC_NAME, &records)
}
