pub mod progress;
pub mod request;
pub mod response;

pub use progress::{CollectionRunProgress, ReorderProgress};
pub use request::{ReorderRequest, ReorderTarget};
pub use response::ReorderResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct CollectionReorder;

impl UseCaseMetadata for CollectionReorder {
    fn usecase_index() -> &'static str {
        "u102"
    }

    fn usecase_name() -> &'static str {
        "collection_reorder"
    }

    fn display_name() -> &'static str {
        "Перестроение коллекций"
    }

    fn description() -> &'static str {
        "Пересортировка товаров коллекции: наличие, свежесть, разнесение брендов"
    }
}
