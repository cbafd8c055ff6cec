use uuid::Uuid;

/// Errors surfaced by the banner service layer, translated into HTTP
/// responses by the route handlers.
#[derive(Debug, thiserror::Error)]
pub enum BannerError {
    /// Input validation failed; all field problems are collected before
    /// failing and nothing is written.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("banner with id {id} is not found")]
    NotFound { id: Uuid },

    /// Capability check failed; no data access happened.
    #[error("permission denied for action '{action}'")]
    PermissionDenied { action: &'static str },

    #[error("invalid sort field '{field}'")]
    InvalidSortField { field: String },

    #[error("invalid sort direction '{direction}' (expected 'asc' or 'desc')")]
    InvalidSortDirection { direction: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
