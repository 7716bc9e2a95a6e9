use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Хранилище JSON-документов
///
/// Каждый набор данных (товары, коллекции, остатки) лежит в отдельном
/// файле в каталоге данных и читается/пишется целиком. Запись идёт через
/// временный файл с последующим rename, чтобы не оставить полуфайл.

fn doc_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

/// Прочитать документ. Если файла нет, вернуть значение по умолчанию.
pub fn load_or_default<T>(dir: &Path, name: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    let path = doc_path(dir, name);
    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
    Ok(value)
}

/// Записать документ целиком
pub fn save<T>(dir: &Path, name: &str, value: &T) -> anyhow::Result<()>
where
    T: Serialize,
{
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("Cannot create data directory {}: {e}", dir.display()))?;

    let path = doc_path(dir, name);
    let tmp_path = dir.join(format!("{}.json.tmp", name));

    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp_path, content)
        .map_err(|e| anyhow::anyhow!("Cannot write {}: {e}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, &path)
        .map_err(|e| anyhow::anyhow!("Cannot replace {}: {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let items: Vec<String> = load_or_default(dir.path(), "missing").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec!["a".to_string(), "b".to_string()];
        save(dir.path(), "items", &items).unwrap();

        let loaded: Vec<String> = load_or_default(dir.path(), "items").unwrap();
        assert_eq!(loaded, items);
        // Временный файл не должен остаться
        assert!(!dir.path().join("items.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), "doc", &vec![1, 2, 3]).unwrap();
        save(dir.path(), "doc", &vec![42]).unwrap();

        let loaded: Vec<i64> = load_or_default(dir.path(), "doc").unwrap();
        assert_eq!(loaded, vec![42]);
    }
}
