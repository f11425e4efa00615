use arcadia_types::errors::ApplicationError;
use arcadia_types::player::{NewPlayer, Player, PlayerWithStats, TopPlayer};

#[async_trait::async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Inserts a new player and returns it with the assigned id.
    /// A duplicate username surfaces as `AppError::UsernameTaken`.
    async fn create(&self, player: &NewPlayer) -> Result<Player, ApplicationError>;

    /// Returns a player by id, or `None`.
    async fn get_by_id(&self, player_id: i32) -> Result<Option<Player>, ApplicationError>;

    /// Returns a player by exact username, or `None`.
    async fn get_by_username(&self, username: &str) -> Result<Option<Player>, ApplicationError>;

    /// All players, ordered by username ascending.
    async fn list_all(&self) -> Result<Vec<Player>, ApplicationError>;

    /// Overwrites the username; `None` when the id does not exist.
    async fn update(&self, player: &Player) -> Result<Option<Player>, ApplicationError>;

    /// Removes a player; `false` when the id does not exist.
    async fn delete(&self, player_id: i32) -> Result<bool, ApplicationError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, ApplicationError>;

    async fn count(&self) -> Result<i64, ApplicationError>;

    /// The player plus session aggregates and their five most recent
    /// sessions; `None` when the id does not exist.
    async fn get_with_statistics(
        &self,
        player_id: i32,
    ) -> Result<Option<PlayerWithStats>, ApplicationError>;

    /// Players holding at least one session, ranked by their single best
    /// session score descending.
    async fn top_players(&self, count: i64) -> Result<Vec<TopPlayer>, ApplicationError>;
}
