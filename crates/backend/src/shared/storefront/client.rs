use super::error::ApiError;
use crate::shared::config::StorefrontConfig;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

/// HTTP-клиент Admin API витрины
pub struct StorefrontClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// Товар коллекции, как его отдаёт Admin API
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub vendor: String,
}

#[derive(Debug, Deserialize)]
struct CollectionProductsResponse {
    products: Vec<RemoteProduct>,
}

impl StorefrontClient {
    pub fn new(config: &StorefrontConfig) -> anyhow::Result<Self> {
        if config.access_token.trim().is_empty() {
            anyhow::bail!("Storefront access token is not configured");
        }
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Установить доступный остаток по складской позиции
    pub async fn set_inventory_level(
        &self,
        inventory_item_id: i64,
        location_id: i64,
        available: i64,
    ) -> Result<(), ApiError> {
        let url = format!("{}/inventory_levels/set.json", self.base_url);
        let body = json!({
            "inventory_item_id": inventory_item_id,
            "location_id": location_id,
            "available": available,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Access-Token", &self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Сменить статус товара ("active" / "draft")
    pub async fn set_product_status(
        &self,
        product_id: i64,
        status: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/products/{}.json", self.base_url, product_id);
        let body = json!({
            "product": { "id": product_id, "status": status },
        });

        let response = self
            .client
            .put(&url)
            .header("X-Access-Token", &self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Получить товары коллекции в их текущем порядке
    pub async fn fetch_collection_products(
        &self,
        collection_id: i64,
    ) -> Result<Vec<RemoteProduct>, ApiError> {
        let url = format!(
            "{}/collections/{}/products.json?limit=250",
            self.base_url, collection_id
        );

        let response = self
            .client
            .get(&url)
            .header("X-Access-Token", &self.access_token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let parsed: CollectionProductsResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(300).collect();
            ApiError::Parse(format!("collection {} products: {e}; body: {preview}", collection_id))
        })?;
        Ok(parsed.products)
    }

    /// Переключить способ сортировки коллекции ("best-selling" / "manual")
    pub async fn set_collection_sort_order(
        &self,
        collection_id: i64,
        sort_order: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/collections/{}.json", self.base_url, collection_id);
        let body = json!({
            "collection": { "id": collection_id, "sort_order": sort_order },
        });

        let response = self
            .client
            .put(&url)
            .header("X-Access-Token", &self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Передвинуть товар на позицию внутри коллекции (нумерация с нуля)
    pub async fn move_product(
        &self,
        collection_id: i64,
        product_id: i64,
        position: i32,
    ) -> Result<(), ApiError> {
        let url = format!("{}/collections/{}/reorder.json", self.base_url, collection_id);
        let body = json!({
            "product_id": product_id,
            "position": position,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Access-Token", &self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ApiError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Storefront API request failed ({}): {}", status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}
