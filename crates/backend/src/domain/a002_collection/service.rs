use super::repository;
use crate::shared::logger;
use contracts::domain::a002_collection::aggregate::{Collection, CollectionUploadResult};

/// Разбор CSV-выгрузки коллекций.
///
/// Ожидаемые колонки: `ID`, `Handle`, `Title`, `Published`.
pub fn parse_collections_csv(content: &str) -> anyhow::Result<(Vec<Collection>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.trim() == name);

    let id_col = col("ID").ok_or_else(|| anyhow::anyhow!("CSV has no 'ID' column"))?;
    let handle_col = col("Handle").ok_or_else(|| anyhow::anyhow!("CSV has no 'Handle' column"))?;
    let title_col = col("Title").ok_or_else(|| anyhow::anyhow!("CSV has no 'Title' column"))?;
    let published_col =
        col("Published").ok_or_else(|| anyhow::anyhow!("CSV has no 'Published' column"))?;

    let mut collections: Vec<Collection> = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let id = match record.get(id_col).unwrap_or("").trim().parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let published_raw = record.get(published_col).unwrap_or("").trim().to_lowercase();
        let published = matches!(published_raw.as_str(), "true" | "1" | "yes");

        collections.push(Collection {
            id,
            handle: record.get(handle_col).unwrap_or("").trim().to_string(),
            title: record.get(title_col).unwrap_or("").trim().to_string(),
            published,
        });
    }

    Ok((collections, skipped))
}

/// Загрузить выгрузку коллекций: разобрать CSV и заменить документ целиком
pub async fn import_csv(content: &str) -> anyhow::Result<CollectionUploadResult> {
    let (collections, skipped) = parse_collections_csv(content)?;
    repository::replace_all(&collections).await?;

    logger::log(
        "collections",
        &format!(
            "Список коллекций загружен: {} коллекций, {} строк пропущено",
            collections.len(),
            skipped
        ),
    );

    Ok(CollectionUploadResult {
        imported: collections.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
ID,Handle,Title,Published
501,summer-sale,Summer Sale,TRUE
502,new-arrivals,New Arrivals,false
oops,broken,Broken Row,true
";

    #[test]
    fn test_parse_collections_csv() {
        let (collections, skipped) = parse_collections_csv(CSV).unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(skipped, 1);

        assert_eq!(collections[0].id, 501);
        assert_eq!(collections[0].handle, "summer-sale");
        assert!(collections[0].published);
        assert!(!collections[1].published);
    }
}
