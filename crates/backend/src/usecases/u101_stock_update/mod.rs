pub mod executor;
pub mod progress_tracker;
pub mod workbook;
