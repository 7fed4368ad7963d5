use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("ORM error: {0}")]
    Orm(#[from] sea_orm::DbErr),

    #[error("Store error: {0}")]
    Store(String),

    #[error("{0} {1} not found")]
    NotFound(&'static str, Uuid),

    #[error("Invalid seed plan: {0}")]
    InvalidPlan(String),

    #[error("Could not draw a unique {0}")]
    Exhausted(&'static str),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;

/// Process status for a finished run: 0 on success, 1 after logging the
/// failure.
pub fn exit_status<T>(outcome: &anyhow::Result<T>) -> i32 {
    match outcome {
        Ok(_) => 0,
        Err(err) => {
            tracing::error!(error = ?err, "seed error");
            1
        }
    }
}
