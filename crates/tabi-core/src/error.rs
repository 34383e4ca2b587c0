use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Plan not found: {0}")]
    PlanNotFound(Uuid),
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(Uuid),
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    /// True for failures raised while committing to a store. The caller may retry these.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CoreError::Persistence(_) | CoreError::Io(_) | CoreError::Serde(_)
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
