use std::sync::Arc;

use arcadia_types::errors::ApplicationError;

use crate::repository::*;

/// A Unit of Work (UoW) works as a provider for repositories
/// that all operate within a single transaction.
#[async_trait::async_trait]
pub trait UnitOfWork<'a>: Send + Sync {
    // Methods to access transactional repositories
    fn players(&self) -> Arc<dyn PlayerRepository + 'a>;
    fn game_sessions(&self) -> Arc<dyn GameSessionRepository + 'a>;

    // Transaction control methods
    // Consume self to ensure the UoW is not used after commit/rollback
    async fn commit(self: Box<Self>) -> Result<(), ApplicationError>;
    async fn rollback(self: Box<Self>) -> Result<(), ApplicationError>;
}

/// A factory for creating Unit of Work instances. It also hands out
/// pool-backed repositories so read-only operations can skip the
/// transaction machinery entirely.
#[async_trait::async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    /// Begin a new Unit of Work (transaction).
    async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError>;

    // Non-transactional repositories for read-only operations.
    fn players(&self) -> Arc<dyn PlayerRepository>;
    fn game_sessions(&self) -> Arc<dyn GameSessionRepository>;
}
