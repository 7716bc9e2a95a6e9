pub mod u101_stock_update;
pub mod u102_collection_reorder;
