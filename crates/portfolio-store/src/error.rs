//! Error types for repository operations.

use thiserror::Error;

use crate::types::Entity;

/// Result type alias for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by repositories.
///
/// Decorators pass these through untouched; only the RPC layer turns them
/// into transport status codes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("failed to query {entity}: {source}")]
    Database {
        entity: Entity,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub fn database(entity: Entity, source: sqlx::Error) -> Self {
        StoreError::Database { entity, source }
    }

    /// Whether this is the typed "no such record" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// The entity the failing operation was reading.
    pub fn entity(&self) -> Entity {
        match self {
            StoreError::NotFound { entity, .. } | StoreError::Database { entity, .. } => *entity,
        }
    }
}
