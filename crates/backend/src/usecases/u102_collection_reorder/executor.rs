use super::moves::plan_moves;
use super::progress_tracker::ProgressTracker;
use super::ranker::{rank, RankProduct};
use crate::domain::{a002_collection, a003_inventory_level};
use crate::shared::config;
use crate::shared::logger;
use crate::shared::storefront::{with_retry, RetryPolicy, StorefrontClient};
use anyhow::Result;
use contracts::domain::a002_collection::aggregate::Collection;
use contracts::usecases::common::{SessionStatus, StartStatus};
use contracts::usecases::u102_collection_reorder::request::{ReorderRequest, ReorderTarget};
use contracts::usecases::u102_collection_reorder::response::ReorderResponse;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Пауза между мутациями витрины (клиентский темп ~2 запроса/сек)
const PACING_DELAY: Duration = Duration::from_millis(500);

/// Executor для UseCase перестроения коллекций
#[derive(Clone)]
pub struct ReorderExecutor {
    client: Arc<StorefrontClient>,
    progress_tracker: Arc<ProgressTracker>,
    retry_policy: RetryPolicy,
    pacing_delay: Duration,
}

impl ReorderExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Result<Self> {
        Ok(Self {
            client: Arc::new(StorefrontClient::new(&config::get().storefront)?),
            progress_tracker,
            retry_policy: RetryPolicy::default(),
            pacing_delay: PACING_DELAY,
        })
    }

    /// Запустить перестроение (создает async task и возвращает session_id)
    pub async fn start_reorder(&self, request: ReorderRequest) -> Result<ReorderResponse> {
        let known = a002_collection::repository::get_all()?;
        let targets: Vec<Collection> = match &request.target {
            ReorderTarget::All => known.into_iter().filter(|c| c.published).collect(),
            ReorderTarget::Collection { id } => {
                let collection = known.into_iter().find(|c| c.id == *id).unwrap_or(Collection {
                    id: *id,
                    handle: String::new(),
                    title: format!("Collection {}", id),
                    published: true,
                });
                vec![collection]
            }
        };
        if targets.is_empty() {
            anyhow::bail!("No published collections to reorder, upload the collections export first");
        }

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        for collection in &targets {
            self.progress_tracker
                .add_collection(&session_id, collection.id, collection.title.clone());
        }

        let self_clone = Arc::new(self.clone());
        let session_id_clone = session_id.clone();

        tokio::spawn(async move {
            if let Err(e) = self_clone.run_reorder(&session_id_clone, &targets).await {
                tracing::error!("Collection reorder failed: {}", e);
                logger::log(
                    "collections",
                    &format!("Перестроение коллекций провалено: {}", e),
                );
                self_clone.progress_tracker.add_error(
                    &session_id_clone,
                    None,
                    format!("Collection reorder failed: {}", e),
                    None,
                );
                self_clone
                    .progress_tracker
                    .complete_session(&session_id_clone, SessionStatus::Failed);
            }
        });

        Ok(ReorderResponse {
            session_id,
            status: StartStatus::Started,
            message: "Перестроение коллекций запущено".to_string(),
        })
    }

    /// Выполнить перестроение по списку коллекций
    async fn run_reorder(&self, session_id: &str, targets: &[Collection]) -> Result<()> {
        tracing::info!("Starting collection reorder for session: {}", session_id);
        logger::log(
            "collections",
            &format!("Начато перестроение: {} коллекций", targets.len()),
        );

        let mut total_errors = 0i32;

        for collection in targets {
            if self.progress_tracker.is_cancelled(session_id) {
                self.finish_cancelled(session_id);
                return Ok(());
            }

            match self.reorder_collection(session_id, collection).await {
                Ok(errors) => total_errors += errors,
                Err(e) => {
                    total_errors += 1;
                    logger::log(
                        "collections",
                        &format!("Коллекция '{}': ошибка: {}", collection.title, e),
                    );
                    self.progress_tracker
                        .fail_collection(session_id, collection.id, e.to_string());
                }
            }
        }

        let status = if self.progress_tracker.is_cancelled(session_id) {
            SessionStatus::Cancelled
        } else if total_errors > 0 {
            SessionStatus::CompletedWithErrors
        } else {
            SessionStatus::Completed
        };
        self.progress_tracker.complete_session(session_id, status);
        logger::log("collections", "Перестроение коллекций завершено");
        tracing::info!("Collection reorder session {} finished", session_id);
        Ok(())
    }

    /// Перестроить одну коллекцию. Возвращает число проваленных перемещений.
    async fn reorder_collection(
        &self,
        session_id: &str,
        collection: &Collection,
    ) -> Result<i32> {
        logger::log(
            "collections",
            &format!("Обрабатываем коллекцию '{}'", collection.title),
        );

        // Сначала автосортировка по продажам: витрина сама выстраивает
        // бестселлеры, и этот порядок становится исходным для ранжирования
        with_retry(&self.retry_policy, "set sort order best-selling", || {
            self.client
                .set_collection_sort_order(collection.id, "best-selling")
        })
        .await?;
        tokio::time::sleep(self.pacing_delay).await;

        let remote = self.client.fetch_collection_products(collection.id).await?;
        if remote.is_empty() {
            logger::log(
                "collections",
                &format!("Коллекция '{}' пуста, пропускаем", collection.title),
            );
            self.progress_tracker.start_collection(session_id, collection.id, 0);
            self.progress_tracker
                .complete_collection(session_id, collection.id);
            return Ok(0);
        }

        let qty_index = a003_inventory_level::service::quantity_index()?;
        let products: Vec<RankProduct> = remote
            .iter()
            .map(|p| RankProduct {
                id: p.id,
                created_at: p.created_at,
                brand: p.vendor.clone(),
                quantity: qty_index.get(&p.id).copied().unwrap_or(0),
            })
            .collect();

        let target_order = rank(&products, chrono::Utc::now(), &mut rand::thread_rng());
        let plan = plan_moves(&target_order);
        self.progress_tracker
            .start_collection(session_id, collection.id, plan.len() as i32);

        // Позиционные записи применяются только в ручном режиме сортировки
        with_retry(&self.retry_policy, "set sort order manual", || {
            self.client.set_collection_sort_order(collection.id, "manual")
        })
        .await?;
        tokio::time::sleep(self.pacing_delay).await;

        let mut issued = 0i32;
        let mut errors = 0i32;

        // Перемещения строго последовательно, по возрастанию позиции:
        // каждое следующее зависит от состояния после предыдущего
        for op in &plan {
            if self.progress_tracker.is_cancelled(session_id) {
                self.progress_tracker
                    .update_moves(session_id, collection.id, issued, errors);
                return Ok(errors);
            }

            match self
                .client
                .move_product(collection.id, op.product_id, op.target_position)
                .await
            {
                Ok(()) => issued += 1,
                Err(e) => {
                    errors += 1;
                    logger::log(
                        "collections",
                        &format!(
                            "Коллекция '{}': перемещение товара {} на позицию {} провалено: {}",
                            collection.title, op.product_id, op.target_position, e
                        ),
                    );
                    self.progress_tracker.add_error(
                        session_id,
                        Some(format!("{}:{}", collection.id, op.product_id)),
                        format!("Move failed: {}", e),
                        None,
                    );
                }
            }
            self.progress_tracker
                .update_moves(session_id, collection.id, issued, errors);
            tokio::time::sleep(self.pacing_delay).await;
        }

        self.progress_tracker
            .complete_collection(session_id, collection.id);
        logger::log(
            "collections",
            &format!(
                "Коллекция '{}' перестроена: {} перемещений, {} ошибок",
                collection.title, issued, errors
            ),
        );
        Ok(errors)
    }

    fn finish_cancelled(&self, session_id: &str) {
        logger::log("collections", "Перестроение коллекций отменено пользователем");
        self.progress_tracker
            .complete_session(session_id, SessionStatus::Cancelled);
    }
}
