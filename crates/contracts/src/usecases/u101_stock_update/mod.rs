pub mod progress;
pub mod request;
pub mod response;

pub use progress::{SheetProgress, UpdateProgress};
pub use request::{CellValue, StockUpdateRequest, WorkSheet, Workbook};
pub use response::StockUpdateResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct StockUpdate;

impl UseCaseMetadata for StockUpdate {
    fn usecase_index() -> &'static str {
        "u101"
    }

    fn usecase_name() -> &'static str {
        "stock_update"
    }

    fn display_name() -> &'static str {
        "Обновление остатков"
    }

    fn description() -> &'static str {
        "Сверка стоковой ведомости поставщика с каталогом и обновление остатков на витрине"
    }
}
