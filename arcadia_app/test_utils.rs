#[cfg(any(test, feature = "test-utils"))]
#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use std::{
        cmp::Ordering,
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use chrono::{DateTime, Utc};

    use arcadia_types::{
        errors::{AppError, ApplicationError},
        game_session::{GameSession, NewGameSession},
        player::{NewPlayer, Player, PlayerWithStats, TopPlayer},
    };

    use crate::{
        repository::{GameSessionRepository, PlayerRepository},
        uow::{UnitOfWork, UnitOfWorkProvider},
    };

    /// In-memory tables shared by every repository a provider hands out,
    /// so writes made through a UoW are visible to pool-backed reads.
    #[derive(Default)]
    pub struct MockStore {
        players: Mutex<HashMap<i32, Player>>,
        sessions: Mutex<HashMap<i32, GameSession>>,
        next_player_id: Mutex<i32>,
        next_session_id: Mutex<i32>,
    }

    /// Score desc, then max level desc, then played_at desc.
    fn leaderboard_order(a: &GameSession, b: &GameSession) -> Ordering {
        b.score
            .cmp(&a.score)
            .then(b.max_level_reached.cmp(&a.max_level_reached))
            .then(b.played_at.cmp(&a.played_at))
    }

    #[derive(Clone)]
    pub struct MockPlayerRepository {
        store: Arc<MockStore>,
    }

    #[async_trait]
    impl PlayerRepository for MockPlayerRepository {
        async fn create(&self, player: &NewPlayer) -> Result<Player, ApplicationError> {
            let mut players = self.store.players.lock().unwrap();
            // Stands in for the unique index on username.
            if players.values().any(|p| p.username == player.username) {
                return Err(AppError::UsernameTaken(player.username.clone()).into());
            }

            let mut next_id = self.store.next_player_id.lock().unwrap();
            *next_id += 1;

            let created = Player {
                player_id: *next_id,
                username: player.username.clone(),
                created_at: player.created_at,
            };
            players.insert(created.player_id, created.clone());
            Ok(created)
        }

        async fn get_by_id(&self, player_id: i32) -> Result<Option<Player>, ApplicationError> {
            Ok(self.store.players.lock().unwrap().get(&player_id).cloned())
        }

        async fn get_by_username(
            &self,
            username: &str,
        ) -> Result<Option<Player>, ApplicationError> {
            Ok(self
                .store
                .players
                .lock()
                .unwrap()
                .values()
                .find(|p| p.username == username)
                .cloned())
        }

        async fn list_all(&self) -> Result<Vec<Player>, ApplicationError> {
            let mut players: Vec<Player> =
                self.store.players.lock().unwrap().values().cloned().collect();
            players.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(players)
        }

        async fn update(&self, player: &Player) -> Result<Option<Player>, ApplicationError> {
            let mut players = self.store.players.lock().unwrap();
            match players.get_mut(&player.player_id) {
                Some(stored) => {
                    stored.username = player.username.clone();
                    Ok(Some(stored.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, player_id: i32) -> Result<bool, ApplicationError> {
            Ok(self.store.players.lock().unwrap().remove(&player_id).is_some())
        }

        async fn exists_by_username(&self, username: &str) -> Result<bool, ApplicationError> {
            Ok(self
                .store
                .players
                .lock()
                .unwrap()
                .values()
                .any(|p| p.username == username))
        }

        async fn count(&self) -> Result<i64, ApplicationError> {
            Ok(self.store.players.lock().unwrap().len() as i64)
        }

        async fn get_with_statistics(
            &self,
            player_id: i32,
        ) -> Result<Option<PlayerWithStats>, ApplicationError> {
            let player = match self.store.players.lock().unwrap().get(&player_id) {
                Some(p) => p.clone(),
                None => return Ok(None),
            };

            let mut sessions: Vec<GameSession> = self
                .store
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.player_id == player_id)
                .cloned()
                .collect();

            let average_score = if sessions.is_empty() {
                0.0
            } else {
                let total: i64 = sessions.iter().map(|s| s.score as i64).sum();
                total as f64 / sessions.len() as f64
            };
            let best_score = sessions.iter().map(|s| s.score).max();
            let max_level = sessions.iter().map(|s| s.max_level_reached).max();
            let total_sessions = sessions.len() as i64;

            sessions.sort_by(|a, b| b.played_at.cmp(&a.played_at));
            sessions.truncate(5);

            Ok(Some(PlayerWithStats {
                player_id: player.player_id,
                username: player.username,
                created_at: player.created_at,
                total_sessions,
                best_score,
                max_level,
                average_score,
                recent_sessions: sessions,
            }))
        }

        async fn top_players(&self, count: i64) -> Result<Vec<TopPlayer>, ApplicationError> {
            let players = self.store.players.lock().unwrap();
            let sessions = self.store.sessions.lock().unwrap();

            let mut entries: Vec<TopPlayer> = players
                .values()
                .filter_map(|player| {
                    let theirs: Vec<&GameSession> = sessions
                        .values()
                        .filter(|s| s.player_id == player.player_id)
                        .collect();
                    // Players without sessions never rank.
                    let best_score = theirs.iter().map(|s| s.score).max()?;
                    let max_level = theirs.iter().map(|s| s.max_level_reached).max()?;

                    Some(TopPlayer {
                        player_id: player.player_id,
                        username: player.username.clone(),
                        created_at: player.created_at,
                        best_score,
                        total_sessions: theirs.len() as i64,
                        max_level,
                    })
                })
                .collect();

            entries.sort_by(|a, b| b.best_score.cmp(&a.best_score));
            entries.truncate(count.max(0) as usize);
            Ok(entries)
        }
    }

    #[derive(Clone)]
    pub struct MockGameSessionRepository {
        store: Arc<MockStore>,
    }

    impl MockGameSessionRepository {
        fn sorted(
            &self,
            filter: impl Fn(&GameSession) -> bool,
            order: impl Fn(&GameSession, &GameSession) -> Ordering,
        ) -> Vec<GameSession> {
            let mut sessions: Vec<GameSession> = self
                .store
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| filter(s))
                .cloned()
                .collect();
            sessions.sort_by(|a, b| order(a, b));
            sessions
        }
    }

    #[async_trait]
    impl GameSessionRepository for MockGameSessionRepository {
        async fn create(
            &self,
            session: &NewGameSession,
        ) -> Result<GameSession, ApplicationError> {
            let mut next_id = self.store.next_session_id.lock().unwrap();
            *next_id += 1;

            let created = GameSession {
                game_session_id: *next_id,
                player_id: session.player_id,
                score: session.score,
                max_level_reached: session.max_level_reached,
                played_at: session.played_at,
            };
            self.store
                .sessions
                .lock()
                .unwrap()
                .insert(created.game_session_id, created.clone());
            Ok(created)
        }

        async fn get_by_id(
            &self,
            game_session_id: i32,
        ) -> Result<Option<GameSession>, ApplicationError> {
            Ok(self
                .store
                .sessions
                .lock()
                .unwrap()
                .get(&game_session_id)
                .cloned())
        }

        async fn list_all(&self) -> Result<Vec<GameSession>, ApplicationError> {
            Ok(self.sorted(|_| true, |a, b| b.played_at.cmp(&a.played_at)))
        }

        async fn get_by_player(
            &self,
            player_id: i32,
        ) -> Result<Vec<GameSession>, ApplicationError> {
            Ok(self.sorted(
                |s| s.player_id == player_id,
                |a, b| b.played_at.cmp(&a.played_at),
            ))
        }

        async fn update(
            &self,
            session: &GameSession,
        ) -> Result<Option<GameSession>, ApplicationError> {
            let mut sessions = self.store.sessions.lock().unwrap();
            match sessions.get_mut(&session.game_session_id) {
                Some(stored) => {
                    *stored = session.clone();
                    Ok(Some(stored.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, game_session_id: i32) -> Result<bool, ApplicationError> {
            Ok(self
                .store
                .sessions
                .lock()
                .unwrap()
                .remove(&game_session_id)
                .is_some())
        }

        async fn delete_by_player(&self, player_id: i32) -> Result<u64, ApplicationError> {
            let mut sessions = self.store.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, s| s.player_id != player_id);
            Ok((before - sessions.len()) as u64)
        }

        async fn delete_all(&self) -> Result<u64, ApplicationError> {
            let mut sessions = self.store.sessions.lock().unwrap();
            let deleted = sessions.len() as u64;
            sessions.clear();
            Ok(deleted)
        }

        async fn top_scores(&self, count: i64) -> Result<Vec<GameSession>, ApplicationError> {
            let mut sessions = self.sorted(|_| true, leaderboard_order);
            sessions.truncate(count.max(0) as usize);
            Ok(sessions)
        }

        async fn top_scores_by_player(
            &self,
            player_id: i32,
            count: i64,
        ) -> Result<Vec<GameSession>, ApplicationError> {
            let mut sessions = self.sorted(|s| s.player_id == player_id, leaderboard_order);
            sessions.truncate(count.max(0) as usize);
            Ok(sessions)
        }

        async fn recent(&self, count: i64) -> Result<Vec<GameSession>, ApplicationError> {
            let mut sessions = self.sorted(|_| true, |a, b| b.played_at.cmp(&a.played_at));
            sessions.truncate(count.max(0) as usize);
            Ok(sessions)
        }

        async fn best_score_by_player(
            &self,
            player_id: i32,
        ) -> Result<Option<GameSession>, ApplicationError> {
            Ok(self
                .sorted(|s| s.player_id == player_id, leaderboard_order)
                .into_iter()
                .next())
        }

        async fn max_level_by_player(&self, player_id: i32) -> Result<i32, ApplicationError> {
            Ok(self
                .store
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.player_id == player_id)
                .map(|s| s.max_level_reached)
                .max()
                .unwrap_or(1))
        }

        async fn average_score_by_player(&self, player_id: i32) -> Result<f64, ApplicationError> {
            let scores: Vec<i64> = self
                .store
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.player_id == player_id)
                .map(|s| s.score as i64)
                .collect();

            if scores.is_empty() {
                return Ok(0.0);
            }
            Ok(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
        }

        async fn count(&self) -> Result<i64, ApplicationError> {
            Ok(self.store.sessions.lock().unwrap().len() as i64)
        }

        async fn count_by_player(&self, player_id: i32) -> Result<i64, ApplicationError> {
            Ok(self
                .store
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.player_id == player_id)
                .count() as i64)
        }

        async fn by_score_range(
            &self,
            min_score: i32,
            max_score: i32,
        ) -> Result<Vec<GameSession>, ApplicationError> {
            Ok(self.sorted(
                |s| s.score >= min_score && s.score <= max_score,
                |a, b| b.score.cmp(&a.score),
            ))
        }

        async fn by_date_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<GameSession>, ApplicationError> {
            Ok(self.sorted(
                |s| s.played_at >= start && s.played_at <= end,
                |a, b| b.played_at.cmp(&a.played_at),
            ))
        }
    }

    pub struct MockUnitOfWork {
        store: Arc<MockStore>,
        // Counters to check how often commit/rollback was called
        commits: Arc<Mutex<u32>>,
        rollbacks: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl<'a> UnitOfWork<'a> for MockUnitOfWork {
        fn players(&self) -> Arc<dyn PlayerRepository + 'a> {
            Arc::new(MockPlayerRepository {
                store: self.store.clone(),
            })
        }

        fn game_sessions(&self) -> Arc<dyn GameSessionRepository + 'a> {
            Arc::new(MockGameSessionRepository {
                store: self.store.clone(),
            })
        }

        async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.commits.lock().unwrap() += 1;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
            *self.rollbacks.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockUnitOfWorkProvider {
        store: Arc<MockStore>,
        commits: Arc<Mutex<u32>>,
        rollbacks: Arc<Mutex<u32>>,
    }

    impl MockUnitOfWorkProvider {
        pub fn new() -> Self {
            Default::default()
        }

        /// How many UoWs handed out by this provider were committed.
        pub fn commits(&self) -> u32 {
            *self.commits.lock().unwrap()
        }

        /// How many UoWs handed out by this provider were rolled back.
        pub fn rollbacks(&self) -> u32 {
            *self.rollbacks.lock().unwrap()
        }
    }

    #[async_trait]
    impl UnitOfWorkProvider for MockUnitOfWorkProvider {
        async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
            let uow: Box<dyn UnitOfWork<'_> + '_> = Box::new(MockUnitOfWork {
                store: self.store.clone(),
                commits: self.commits.clone(),
                rollbacks: self.rollbacks.clone(),
            });
            Ok(uow)
        }

        fn players(&self) -> Arc<dyn PlayerRepository> {
            Arc::new(MockPlayerRepository {
                store: self.store.clone(),
            })
        }

        fn game_sessions(&self) -> Arc<dyn GameSessionRepository> {
            Arc::new(MockGameSessionRepository {
                store: self.store.clone(),
            })
        }
    }
}
