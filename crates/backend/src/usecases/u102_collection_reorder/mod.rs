pub mod executor;
pub mod moves;
pub mod progress_tracker;
pub mod ranker;
