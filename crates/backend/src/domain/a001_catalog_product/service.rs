use super::repository;
use crate::shared::logger;
use contracts::domain::a001_catalog_product::aggregate::{CatalogProduct, CatalogUploadResult};
use std::collections::HashMap;

/// Разбор CSV-выгрузки каталога.
///
/// Ожидаемые колонки: `ID`, `Variant Inventory Item ID`, `Variant ID`,
/// `Variant SKU`. Строки с пустым SKU или нечисловыми идентификаторами
/// пропускаются и считаются в `skipped`.
pub fn parse_catalog_csv(content: &str) -> anyhow::Result<(Vec<CatalogProduct>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.trim() == name);

    let id_col = col("ID").ok_or_else(|| anyhow::anyhow!("CSV has no 'ID' column"))?;
    let item_col = col("Variant Inventory Item ID")
        .ok_or_else(|| anyhow::anyhow!("CSV has no 'Variant Inventory Item ID' column"))?;
    let variant_col =
        col("Variant ID").ok_or_else(|| anyhow::anyhow!("CSV has no 'Variant ID' column"))?;
    let sku_col =
        col("Variant SKU").ok_or_else(|| anyhow::anyhow!("CSV has no 'Variant SKU' column"))?;

    let mut products: Vec<CatalogProduct> = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let sku = record.get(sku_col).unwrap_or("").trim().to_string();
        if sku.is_empty() {
            skipped += 1;
            continue;
        }

        let parse_id = |idx: usize| record.get(idx).unwrap_or("").trim().parse::<i64>().ok();
        match (parse_id(id_col), parse_id(item_col), parse_id(variant_col)) {
            (Some(product_id), Some(inventory_item_id), Some(variant_id)) => {
                products.push(CatalogProduct {
                    sku,
                    product_id,
                    inventory_item_id,
                    variant_id,
                });
            }
            _ => skipped += 1,
        }
    }

    Ok((products, skipped))
}

/// Загрузить выгрузку каталога: разобрать CSV и заменить документ целиком
pub async fn import_csv(content: &str) -> anyhow::Result<CatalogUploadResult> {
    let (products, skipped) = parse_catalog_csv(content)?;
    repository::replace_all(&products).await?;

    logger::log(
        "catalog",
        &format!(
            "Каталог загружен: {} позиций, {} строк пропущено",
            products.len(),
            skipped
        ),
    );

    Ok(CatalogUploadResult {
        imported: products.len(),
        skipped,
    })
}

/// Построить индекс SKU → запись каталога
///
/// SKU нормализуется trim-ом; при дубликатах побеждает последняя запись.
pub fn build_sku_index(products: Vec<CatalogProduct>) -> HashMap<String, CatalogProduct> {
    let mut index = HashMap::with_capacity(products.len());
    for product in products {
        index.insert(product.sku.trim().to_string(), product);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
ID,Handle,Variant Inventory Item ID,Variant ID,Variant SKU
1001,first-product,2001,3001,SKU-A
1002,second-product,2002,3002, SKU-B \n\
1003,no-sku-product,2003,3003,
1004,bad-id-product,not-a-number,3004,SKU-D
";

    #[test]
    fn test_parse_catalog_csv() {
        let (products, skipped) = parse_catalog_csv(CSV).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(skipped, 2);

        assert_eq!(products[0].sku, "SKU-A");
        assert_eq!(products[0].product_id, 1001);
        assert_eq!(products[0].inventory_item_id, 2001);
        assert_eq!(products[0].variant_id, 3001);
        // SKU очищается от пробелов
        assert_eq!(products[1].sku, "SKU-B");
    }

    #[test]
    fn test_parse_catalog_csv_missing_column() {
        let result = parse_catalog_csv("ID,Variant ID\n1,2\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_sku_index_last_wins() {
        let products = vec![
            CatalogProduct {
                sku: "SKU-A".into(),
                product_id: 1,
                inventory_item_id: 10,
                variant_id: 100,
            },
            CatalogProduct {
                sku: "SKU-A".into(),
                product_id: 2,
                inventory_item_id: 20,
                variant_id: 200,
            },
        ];
        let index = build_sku_index(products);
        assert_eq!(index.len(), 1);
        assert_eq!(index["SKU-A"].product_id, 2);
    }
}
