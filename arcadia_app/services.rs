mod game_session_service;
mod player_service;

pub use game_session_service::GameSessionService;
pub use player_service::PlayerService;

use crate::uow::UnitOfWork;

// Best-effort rollback; preserve the original error.
pub(crate) async fn rollback_on_error(uow: Box<dyn UnitOfWork<'_> + '_>) {
    if let Err(e) = uow.rollback().await {
        tracing::error!(error = %e, "rollback after failed write also failed");
    }
}
