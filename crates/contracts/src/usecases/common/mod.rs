//! Общие типы для всех UseCase

pub mod session;
pub mod usecase_metadata;

pub use session::{SessionError, SessionStatus, StartStatus};
pub use usecase_metadata::UseCaseMetadata;
