use crate::shared::config;
use crate::shared::data::doc_store;
use contracts::domain::a002_collection::aggregate::Collection;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

const DOC_NAME: &str = "collections";

// Единственный писатель на документ collections.json
static WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Прочитать список коллекций целиком
pub fn get_all() -> anyhow::Result<Vec<Collection>> {
    let dir = config::get_data_dir(config::get())?;
    doc_store::load_or_default(&dir, DOC_NAME)
}

/// Заменить список коллекций целиком
pub async fn replace_all(collections: &[Collection]) -> anyhow::Result<()> {
    let _guard = WRITE_LOCK.lock().await;
    let dir = config::get_data_dir(config::get())?;
    doc_store::save(&dir, DOC_NAME, &collections)
}
