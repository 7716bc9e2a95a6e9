use super::progress_tracker::ProgressTracker;
use super::workbook::{self, RowOutcome, SkipReason};
use crate::domain::{a001_catalog_product, a003_inventory_level};
use crate::shared::config;
use crate::shared::logger;
use crate::shared::storefront::{with_retry, RetryPolicy, StorefrontClient};
use anyhow::Result;
use contracts::domain::a001_catalog_product::aggregate::CatalogProduct;
use contracts::usecases::common::{SessionStatus, StartStatus};
use contracts::usecases::u101_stock_update::request::{StockUpdateRequest, Workbook};
use contracts::usecases::u101_stock_update::response::StockUpdateResponse;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Пауза между мутациями витрины (клиентский темп ~2 запроса/сек)
const PACING_DELAY: Duration = Duration::from_millis(500);

/// Executor для UseCase обновления остатков
#[derive(Clone)]
pub struct StockUpdateExecutor {
    client: Arc<StorefrontClient>,
    progress_tracker: Arc<ProgressTracker>,
    retry_policy: RetryPolicy,
    pacing_delay: Duration,
}

impl StockUpdateExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Result<Self> {
        Ok(Self {
            client: Arc::new(StorefrontClient::new(&config::get().storefront)?),
            progress_tracker,
            retry_policy: RetryPolicy::default(),
            pacing_delay: PACING_DELAY,
        })
    }

    /// Запустить обновление (создает async task и возвращает session_id)
    pub async fn start_update(&self, request: StockUpdateRequest) -> Result<StockUpdateResponse> {
        if request.workbook.sheets.is_empty() {
            anyhow::bail!("Workbook has no sheets");
        }

        // Каталог читается один раз на сессию и не меняется по ходу
        let products = a001_catalog_product::repository::get_all()?;
        if products.is_empty() {
            anyhow::bail!("Catalog is empty, upload the catalog export first");
        }
        let catalog = a001_catalog_product::service::build_sku_index(products);

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        for sheet in &request.workbook.sheets {
            self.progress_tracker
                .add_sheet(&session_id, sheet.name.clone());
        }

        let self_clone = Arc::new(self.clone());
        let session_id_clone = session_id.clone();

        tokio::spawn(async move {
            if let Err(e) = self_clone
                .run_update(&session_id_clone, &request.workbook, &catalog)
                .await
            {
                tracing::error!("Stock update failed: {}", e);
                logger::log("stock", &format!("Обновление остатков провалено: {}", e));
                self_clone.progress_tracker.add_error(
                    &session_id_clone,
                    None,
                    format!("Stock update failed: {}", e),
                    None,
                );
                self_clone
                    .progress_tracker
                    .complete_session(&session_id_clone, SessionStatus::Failed);
            }
        });

        Ok(StockUpdateResponse {
            session_id,
            status: StartStatus::Started,
            message: "Обновление остатков запущено".to_string(),
        })
    }

    /// Выполнить обновление остатков
    async fn run_update(
        &self,
        session_id: &str,
        workbook: &Workbook,
        catalog: &HashMap<String, CatalogProduct>,
    ) -> Result<()> {
        tracing::info!("Starting stock update for session: {}", session_id);
        logger::log(
            "stock",
            &format!("Начато обновление остатков: {} листов", workbook.sheets.len()),
        );

        let today = chrono::Utc::now().date_naive();
        let location_id = config::get().storefront.location_id;
        let mut total_errors = 0i32;

        for sheet in &workbook.sheets {
            if self.progress_tracker.is_cancelled(session_id) {
                self.finish_cancelled(session_id);
                return Ok(());
            }

            if sheet.rows.len() <= workbook::data_start_idx() {
                logger::log(
                    "stock",
                    &format!("Лист '{}' пуст, пропускаем", sheet.name),
                );
                self.progress_tracker.complete_sheet(session_id, &sheet.name);
                continue;
            }

            self.progress_tracker.start_sheet(session_id, &sheet.name);
            logger::log("stock", &format!("Обрабатываем лист '{}'", sheet.name));

            let header = workbook::scan_header(sheet);
            let mut rows = 0i32;
            let mut updated = 0i32;
            let mut skipped = 0i32;
            let mut drafted = 0i32;
            let mut errors = 0i32;

            for row in sheet.rows.iter().skip(workbook::data_start_idx()) {
                if self.progress_tracker.is_cancelled(session_id) {
                    self.progress_tracker.update_sheet(
                        session_id, &sheet.name, rows, updated, skipped, drafted, errors,
                    );
                    self.finish_cancelled(session_id);
                    return Ok(());
                }

                rows += 1;
                match workbook::reconcile_row(row, &header, catalog, today) {
                    RowOutcome::Skip(reason) => {
                        skipped += 1;
                        match reason {
                            SkipReason::NoSku => {}
                            SkipReason::QuantityUndetermined { sku } => {
                                tracing::debug!("{}: quantity undetermined, row skipped", sku);
                            }
                            SkipReason::UnknownSku { sku } => {
                                tracing::debug!("{}: not found in catalog, row skipped", sku);
                            }
                            SkipReason::Stale { sku, days } => {
                                tracing::debug!("{}: count is {} days old, row skipped", sku, days);
                            }
                        }
                    }
                    RowOutcome::Command(cmd) => {
                        self.progress_tracker.set_current_item(
                            session_id,
                            &sheet.name,
                            Some(cmd.sku.clone()),
                        );

                        let apply = with_retry(
                            &self.retry_policy,
                            &format!("set inventory for {}", cmd.sku),
                            || {
                                self.client.set_inventory_level(
                                    cmd.inventory_item_id,
                                    location_id,
                                    cmd.quantity,
                                )
                            },
                        )
                        .await;
                        tokio::time::sleep(self.pacing_delay).await;

                        match apply {
                            Ok(()) => {
                                updated += 1;
                                logger::log(
                                    "stock",
                                    &format!("{}: остаток установлен в {}", cmd.sku, cmd.quantity),
                                );
                                if let Err(e) = a003_inventory_level::service::record_quantity(
                                    &cmd.sku,
                                    cmd.product_id,
                                    cmd.quantity,
                                )
                                .await
                                {
                                    tracing::error!(
                                        "Failed to persist quantity for {}: {}",
                                        cmd.sku,
                                        e
                                    );
                                }

                                if cmd.requested_draft {
                                    // Отдельная мутация; её провал не откатывает остаток
                                    match with_retry(
                                        &self.retry_policy,
                                        &format!("draft product {}", cmd.sku),
                                        || self.client.set_product_status(cmd.product_id, "draft"),
                                    )
                                    .await
                                    {
                                        Ok(()) => {
                                            drafted += 1;
                                            logger::log(
                                                "stock",
                                                &format!(
                                                    "{}: товар переведён в черновики",
                                                    cmd.sku
                                                ),
                                            );
                                        }
                                        Err(e) => {
                                            errors += 1;
                                            total_errors += 1;
                                            logger::log(
                                                "stock",
                                                &format!(
                                                    "{}: не удалось перевести в черновики: {}",
                                                    cmd.sku, e
                                                ),
                                            );
                                            self.progress_tracker.add_error(
                                                session_id,
                                                Some(cmd.sku.clone()),
                                                format!("Draft failed: {}", e),
                                                None,
                                            );
                                        }
                                    }
                                    tokio::time::sleep(self.pacing_delay).await;
                                }
                            }
                            Err(e) => {
                                errors += 1;
                                total_errors += 1;
                                logger::log(
                                    "stock",
                                    &format!("{}: ошибка обновления остатка: {}", cmd.sku, e),
                                );
                                self.progress_tracker.add_error(
                                    session_id,
                                    Some(cmd.sku.clone()),
                                    format!("Inventory update failed: {}", e),
                                    None,
                                );
                            }
                        }
                    }
                }

                self.progress_tracker.update_sheet(
                    session_id, &sheet.name, rows, updated, skipped, drafted, errors,
                );
            }

            self.progress_tracker.complete_sheet(session_id, &sheet.name);
            logger::log(
                "stock",
                &format!(
                    "Лист '{}' обработан: строк {}, обновлено {}, пропущено {}, ошибок {}",
                    sheet.name, rows, updated, skipped, errors
                ),
            );
        }

        let status = if total_errors > 0 {
            SessionStatus::CompletedWithErrors
        } else {
            SessionStatus::Completed
        };
        self.progress_tracker.complete_session(session_id, status);
        logger::log("stock", "Обновление остатков завершено");
        tracing::info!("Stock update session {} finished", session_id);
        Ok(())
    }

    fn finish_cancelled(&self, session_id: &str) {
        logger::log("stock", "Обновление остатков отменено пользователем");
        self.progress_tracker
            .complete_session(session_id, SessionStatus::Cancelled);
    }
}
