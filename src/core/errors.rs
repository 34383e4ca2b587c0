use tabi_config::ConfigError;
use tabi_core::CoreError;
use thiserror::Error;

/// Error type surfaced by the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Could not save changes: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => AppError::Validation(message),
            CoreError::PlanNotFound(_)
            | CoreError::ScheduleNotFound(_)
            | CoreError::ItemNotFound(_) => AppError::NotFound(err.to_string()),
            other => AppError::Persistence(other.to_string()),
        }
    }
}

impl AppError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn core_errors_map_to_user_facing_kinds() {
        let missing: AppError = CoreError::PlanNotFound(Uuid::nil()).into();
        assert!(matches!(missing, AppError::NotFound(_)));

        let invalid: AppError = CoreError::validation("title must not be empty").into();
        assert_eq!(invalid.to_string(), "title must not be empty");

        let failed: AppError = CoreError::Persistence("disk full".into()).into();
        assert!(failed.is_persistence());
    }
}
