use crate::shared::config;
use crate::shared::data::doc_store;
use contracts::domain::a001_catalog_product::aggregate::CatalogProduct;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

const DOC_NAME: &str = "products";

// Единственный писатель на документ products.json
static WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Прочитать каталог целиком
pub fn get_all() -> anyhow::Result<Vec<CatalogProduct>> {
    let dir = config::get_data_dir(config::get())?;
    doc_store::load_or_default(&dir, DOC_NAME)
}

/// Заменить каталог целиком (загрузка новой выгрузки)
pub async fn replace_all(products: &[CatalogProduct]) -> anyhow::Result<()> {
    let _guard = WRITE_LOCK.lock().await;
    let dir = config::get_data_dir(config::get())?;
    doc_store::save(&dir, DOC_NAME, &products)
}
