use std::sync::Arc;

use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};

use arcadia_types::{
    Result,
    errors::AppError,
    player::{NewPlayer, Player, PlayerWithStats, TopPlayer},
};

use super::rollback_on_error;
use crate::uow::UnitOfWorkProvider;

const USERNAME_MAX_ATTEMPTS: u32 = 100;

/// Player lifecycle and player-side leaderboard queries. Writes run
/// inside a Unit of Work; reads go straight to the pool repositories.
pub struct PlayerService {
    provider: Arc<dyn UnitOfWorkProvider>,
}

impl PlayerService {
    pub fn new(provider: Arc<dyn UnitOfWorkProvider>) -> Self {
        Self { provider }
    }

    /// Creates a player. A blank username is replaced with a generated
    /// `Player<5 digits>` one before validation.
    pub async fn create_player(&self, username: &str) -> Result<Player> {
        let username = if username.trim().is_empty() {
            self.generate_random_username().await?
        } else {
            username.to_string()
        };

        // The unique index on username still backs this up under races.
        if !self.is_valid_username(&username).await? {
            return Err(AppError::UsernameTaken(username).into());
        }

        let uow = self.provider.begin().await?;
        let result = uow.players().create(&NewPlayer::new(username)).await;

        match result {
            Ok(player) => {
                uow.commit().await?;
                tracing::info!(
                    player_id = player.player_id,
                    username = %player.username,
                    "player created"
                );
                Ok(player)
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    pub async fn get_player_by_id(&self, player_id: i32) -> Result<Option<Player>> {
        self.provider.players().get_by_id(player_id).await
    }

    pub async fn get_player_by_username(&self, username: &str) -> Result<Option<Player>> {
        self.provider.players().get_by_username(username).await
    }

    pub async fn get_all_players(&self) -> Result<Vec<Player>> {
        self.provider.players().list_all().await
    }

    /// Overwrites the player's username. The id must already exist.
    pub async fn update_player(&self, player: &Player) -> Result<Player> {
        let uow = self.provider.begin().await?;
        let result = uow.players().update(player).await;

        match result {
            Ok(Some(updated)) => {
                uow.commit().await?;
                tracing::info!(player_id = updated.player_id, "player updated");
                Ok(updated)
            }
            Ok(None) => {
                uow.rollback().await?;
                Err(AppError::PlayerNotFound(player.player_id).into())
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    /// Deletes a player and every session they own, atomically.
    /// Returns `false` when the player does not exist.
    pub async fn delete_player(&self, player_id: i32) -> Result<bool> {
        let uow = self.provider.begin().await?;

        let result = async {
            if uow.players().get_by_id(player_id).await?.is_none() {
                return Ok(false);
            }

            // Explicit cascade: sessions first, then the player row.
            uow.game_sessions().delete_by_player(player_id).await?;
            uow.players().delete(player_id).await?;
            Ok(true)
        }
        .await;

        match result {
            Ok(true) => {
                uow.commit().await?;
                tracing::info!(player_id, "player deleted");
                Ok(true)
            }
            Ok(false) => {
                uow.rollback().await?;
                Ok(false)
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    pub async fn player_exists_by_username(&self, username: &str) -> Result<bool> {
        self.provider.players().exists_by_username(username).await
    }

    pub async fn get_player_with_statistics(
        &self,
        player_id: i32,
    ) -> Result<Option<PlayerWithStats>> {
        self.provider.players().get_with_statistics(player_id).await
    }

    pub async fn count_players(&self) -> Result<i64> {
        self.provider.players().count().await
    }

    /// Players ranked by their single best session score, descending.
    /// Players without any session do not appear.
    pub async fn get_top_players(&self, count: i64) -> Result<Vec<TopPlayer>> {
        self.provider.players().top_players(count).await
    }

    /// A username is valid when it is non-blank and nobody holds it yet.
    pub async fn is_valid_username(&self, username: &str) -> Result<bool> {
        if username.trim().is_empty() {
            return Ok(false);
        }

        Ok(!self.player_exists_by_username(username).await?)
    }

    /// Draws `Player<5 digits>` candidates until one is free, reusing a
    /// single RNG across attempts. After `USERNAME_MAX_ATTEMPTS` draws
    /// the current Unix timestamp decides, without a further check.
    async fn generate_random_username(&self) -> Result<String> {
        let players = self.provider.players();
        let mut rng = StdRng::from_entropy();

        for _ in 0..USERNAME_MAX_ATTEMPTS {
            let username = format!("Player{}", rng.gen_range(10_000..=99_999));
            if !players.exists_by_username(&username).await? {
                return Ok(username);
            }
        }

        Ok(format!("Player{:05}", Utc::now().timestamp() % 100_000))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arcadia_types::Result;
    use arcadia_types::errors::ApplicationError;
    use arcadia_types::game_session::NewGameSession;

    use super::*;
    use crate::test_utils::tests::MockUnitOfWorkProvider;

    fn service_with_provider() -> (PlayerService, Arc<MockUnitOfWorkProvider>) {
        let provider = Arc::new(MockUnitOfWorkProvider::new());
        (PlayerService::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_create_player_with_explicit_username() -> Result<()> {
        let (service, provider) = service_with_provider();

        let player = service.create_player("BlinkyHunter").await?;

        assert_eq!(player.username, "BlinkyHunter");
        assert!(player.player_id > 0);
        assert_eq!(provider.commits(), 1);
        assert_eq!(provider.rollbacks(), 0);

        let found = service.get_player_by_username("BlinkyHunter").await?;
        assert_eq!(found, Some(player));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_player_generates_username_when_blank() -> Result<()> {
        let (service, _provider) = service_with_provider();

        let player = service.create_player("   ").await?;

        let digits = player
            .username
            .strip_prefix("Player")
            .expect("generated username starts with Player");
        assert_eq!(digits.len(), 5);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_player_rejects_taken_username() -> Result<()> {
        let (service, provider) = service_with_provider();
        service.create_player("Clyde").await?;

        let err = service.create_player("Clyde").await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::App(AppError::UsernameTaken(ref name)) if name == "Clyde"
        ));
        // The duplicate is refused before a second transaction opens.
        assert_eq!(provider.commits(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_generated_username_avoids_existing_players() -> Result<()> {
        let (service, _provider) = service_with_provider();
        let first = service.create_player("").await?;
        let second = service.create_player("").await?;

        assert_ne!(first.username, second.username);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_player_overwrites_username() -> Result<()> {
        let (service, _provider) = service_with_provider();
        let created = service.create_player("Pinky").await?;

        let updated = service
            .update_player(&Player {
                username: "Inky".to_string(),
                ..created.clone()
            })
            .await?;

        assert_eq!(updated.player_id, created.player_id);
        assert_eq!(updated.username, "Inky");
        assert_eq!(updated.created_at, created.created_at);
        assert!(service.get_player_by_username("Pinky").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_player_unknown_id_rolls_back() -> Result<()> {
        let (service, provider) = service_with_provider();

        let err = service
            .update_player(&Player {
                player_id: 999,
                username: "Ghost".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::App(AppError::PlayerNotFound(999))
        ));
        assert_eq!(provider.commits(), 0);
        assert_eq!(provider.rollbacks(), 1);
        assert!(service.get_all_players().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_player_cascades_to_sessions() -> Result<()> {
        let (service, provider) = service_with_provider();
        let player = service.create_player("Chomp").await?;

        let sessions = provider.game_sessions();
        for score in [100, 250, 775] {
            sessions
                .create(&NewGameSession::with_result(player.player_id, score, 2))
                .await?;
        }

        let deleted = service.delete_player(player.player_id).await?;

        assert!(deleted);
        assert!(service.get_player_by_id(player.player_id).await?.is_none());
        assert!(sessions.get_by_player(player.player_id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_player_unknown_id_returns_false() -> Result<()> {
        let (service, provider) = service_with_provider();

        let deleted = service.delete_player(41).await?;

        assert!(!deleted);
        assert_eq!(provider.commits(), 0);
        assert_eq!(provider.rollbacks(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_players_orders_by_username() -> Result<()> {
        let (service, _provider) = service_with_provider();
        service.create_player("zeta").await?;
        service.create_player("Alpha").await?;
        service.create_player("Mid").await?;

        let players = service.get_all_players().await?;
        let names: Vec<&str> = players.iter().map(|p| p.username.as_str()).collect();

        assert_eq!(names, vec!["Alpha", "Mid", "zeta"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_top_players_ranked_by_best_score() -> Result<()> {
        let (service, provider) = service_with_provider();
        let low = service.create_player("LowScorer").await?;
        let high = service.create_player("HighScorer").await?;
        service.create_player("NeverPlayed").await?;

        let sessions = provider.game_sessions();
        sessions
            .create(&NewGameSession::with_result(low.player_id, 300, 2))
            .await?;
        sessions
            .create(&NewGameSession::with_result(high.player_id, 150, 1))
            .await?;
        sessions
            .create(&NewGameSession::with_result(high.player_id, 900, 5))
            .await?;

        let top = service.get_top_players(10).await?;

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username, "HighScorer");
        assert_eq!(top[0].best_score, 900);
        assert_eq!(top[0].total_sessions, 2);
        assert_eq!(top[1].username, "LowScorer");
        Ok(())
    }

    #[tokio::test]
    async fn test_player_statistics_aggregates() -> Result<()> {
        let (service, provider) = service_with_provider();
        let player = service.create_player("StatsGuy").await?;

        let sessions = provider.game_sessions();
        for (score, level) in [(10, 1), (20, 3), (30, 2)] {
            sessions
                .create(&NewGameSession::with_result(player.player_id, score, level))
                .await?;
        }

        let stats = service
            .get_player_with_statistics(player.player_id)
            .await?
            .expect("player exists");

        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.best_score, Some(30));
        assert_eq!(stats.max_level, Some(3));
        assert_eq!(stats.average_score, 20.0);
        assert_eq!(stats.recent_sessions.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_is_valid_username() -> Result<()> {
        let (service, _provider) = service_with_provider();
        service.create_player("Taken").await?;

        assert!(!service.is_valid_username("").await?);
        assert!(!service.is_valid_username("  \t").await?);
        assert!(!service.is_valid_username("Taken").await?);
        assert!(service.is_valid_username("Free").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_count_players() -> Result<()> {
        let (service, _provider) = service_with_provider();
        assert_eq!(service.count_players().await?, 0);

        service.create_player("One").await?;
        service.create_player("Two").await?;

        assert_eq!(service.count_players().await?, 2);
        Ok(())
    }
}
