//! The match registry.
//!
//! An explicit service object owning the member → match mapping for the
//! whole process. Constructor-injected into the command router; there is
//! no ambient global state. A member belongs to at most one match at a
//! time, enforced when matches are created and participants added.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::arena::game::Game;
use crate::arena::mode::Mode;
use crate::arena::render::Transport;
use crate::arena::session::{spawn_watchdog, MatchSession};
use crate::common::error::{ArenaError, ArenaResult};
use crate::common::types::{ChannelKey, MemberId, Participant};
use crate::roster::Roster;

pub type SharedSession = Arc<AsyncMutex<MatchSession>>;

pub struct MatchRegistry {
    sessions: Mutex<HashMap<MemberId, SharedSession>>,
    transport: Arc<dyn Transport>,
    idle_timeout: Duration,
    confirm_timeout: Duration,
}

impl MatchRegistry {
    pub fn new(
        transport: Arc<dyn Transport>,
        idle_timeout: Duration,
        confirm_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(HashMap::new()),
            transport,
            idle_timeout,
            confirm_timeout,
        })
    }

    /// The match a member currently plays in, if any.
    pub fn session_for(&self, member: MemberId) -> Option<SharedSession> {
        self.sessions.lock().unwrap().get(&member).cloned()
    }

    /// Create a match for the given participants and spawn its watchdog.
    ///
    /// Duplicate mentions collapse to one participant; fewer than two
    /// distinct participants, or any participant already in a match,
    /// fails without side effects.
    pub fn create_match(
        self: &Arc<Self>,
        channel: ChannelKey,
        mode: Mode,
        winning_score: u32,
        max_bans: usize,
        participants: Vec<Participant>,
    ) -> ArenaResult<SharedSession> {
        let mut seen = HashSet::new();
        let unique: Vec<Participant> = participants
            .into_iter()
            .filter(|p| seen.insert(p.id))
            .collect();
        if unique.len() < 2 {
            return Err(ArenaError::NotEnoughPlayers { got: unique.len() });
        }

        let mut map = self.sessions.lock().unwrap();
        for p in &unique {
            if map.contains_key(&p.id) {
                return Err(ArenaError::AlreadyInMatch {
                    name: p.name.clone(),
                });
            }
        }

        info!(
            "Starting {} match in channel {} with {} players",
            mode.name(),
            channel,
            unique.len()
        );

        let game = Game::new(Roster::global(), mode, winning_score, max_bans, unique.clone());
        let (session, activity_rx) = MatchSession::new(game, channel);
        let shared = Arc::new(AsyncMutex::new(session));
        for p in &unique {
            map.insert(p.id, shared.clone());
        }
        drop(map);

        let handle = spawn_watchdog(
            Arc::downgrade(&shared),
            self.clone(),
            self.transport.clone(),
            self.idle_timeout,
            self.confirm_timeout,
            activity_rx,
        );
        // Nothing else can hold this lock yet; the watchdog only takes it
        // after the idle period.
        match shared.try_lock() {
            Ok(mut guard) => guard.watchdog = Some(handle),
            Err(_) => warn!("Could not store watchdog handle for channel {}", channel),
        }

        Ok(shared)
    }

    /// Register an additional member into an existing match's mapping.
    pub fn register_member(
        &self,
        member: MemberId,
        name: &str,
        session: &SharedSession,
    ) -> ArenaResult<()> {
        let mut map = self.sessions.lock().unwrap();
        if map.contains_key(&member) {
            return Err(ArenaError::AlreadyInMatch {
                name: name.to_string(),
            });
        }
        map.insert(member, session.clone());
        Ok(())
    }

    /// Tear a match down: cancel its watchdog and release every
    /// participant. The caller holds the session lock.
    pub fn teardown(&self, session: &mut MatchSession) {
        if let Some(handle) = session.watchdog.take() {
            handle.abort();
        }
        let members: Vec<MemberId> = session.game.players().iter().map(|p| p.member).collect();
        let mut map = self.sessions.lock().unwrap();
        for member in members {
            map.remove(&member);
        }
        info!("Match in channel {} torn down", session.channel);
    }

    #[cfg(test)]
    pub fn registered_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::render::{MessageHandle, RenderPayload};
    use crate::common::error::TransportResult;
    use serenity::async_trait;

    struct NullTransport;

    #[async_trait]
    impl Transport for NullTransport {
        async fn send(
            &self,
            channel: ChannelKey,
            _payload: &RenderPayload,
        ) -> TransportResult<MessageHandle> {
            Ok(MessageHandle {
                channel,
                message: 0,
            })
        }

        async fn edit(
            &self,
            _handle: MessageHandle,
            _payload: &RenderPayload,
        ) -> TransportResult<()> {
            Ok(())
        }

        async fn delete(&self, _handle: MessageHandle) -> TransportResult<()> {
            Ok(())
        }

        async fn send_text(
            &self,
            channel: ChannelKey,
            _text: &str,
        ) -> TransportResult<MessageHandle> {
            Ok(MessageHandle {
                channel,
                message: 1,
            })
        }

        async fn notice(&self, _channel: ChannelKey, _text: &str) -> TransportResult<()> {
            Ok(())
        }
    }

    fn registry() -> Arc<MatchRegistry> {
        MatchRegistry::new(
            Arc::new(NullTransport),
            Duration::from_secs(1800),
            Duration::from_secs(120),
        )
    }

    fn participants(ids: &[(MemberId, &str)]) -> Vec<Participant> {
        ids.iter().map(|(id, name)| Participant::new(*id, *name)).collect()
    }

    #[tokio::test]
    async fn test_create_registers_every_member() {
        let registry = registry();
        let session = registry
            .create_match(
                7,
                Mode::Open,
                3,
                0,
                participants(&[(1, "A"), (2, "B"), (3, "C")]),
            )
            .unwrap();

        assert_eq!(registry.registered_count(), 3);
        for id in [1, 2, 3] {
            assert!(Arc::ptr_eq(&registry.session_for(id).unwrap(), &session));
        }
    }

    #[tokio::test]
    async fn test_duplicate_mentions_collapse() {
        let registry = registry();
        let err = registry
            .create_match(7, Mode::Open, 0, 0, participants(&[(1, "A"), (1, "A")]))
            .unwrap_err();
        assert_eq!(err, ArenaError::NotEnoughPlayers { got: 1 });
        assert_eq!(registry.registered_count(), 0);
    }

    #[tokio::test]
    async fn test_one_match_per_member() {
        let registry = registry();
        registry
            .create_match(7, Mode::Open, 0, 0, participants(&[(1, "A"), (2, "B")]))
            .unwrap();

        let err = registry
            .create_match(8, Mode::Open, 0, 0, participants(&[(2, "B"), (3, "C")]))
            .unwrap_err();
        assert_eq!(
            err,
            ArenaError::AlreadyInMatch {
                name: "B".to_string()
            }
        );
        // The failed create must not have leaked C into the mapping.
        assert!(registry.session_for(3).is_none());
    }

    #[tokio::test]
    async fn test_register_member_mid_match() {
        let registry = registry();
        let session = registry
            .create_match(7, Mode::Open, 0, 0, participants(&[(1, "A"), (2, "B")]))
            .unwrap();

        registry.register_member(3, "C", &session).unwrap();
        assert!(registry.session_for(3).is_some());

        let err = registry.register_member(3, "C", &session).unwrap_err();
        assert_eq!(
            err,
            ArenaError::AlreadyInMatch {
                name: "C".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_teardown_releases_members_and_watchdog() {
        let registry = registry();
        let session = registry
            .create_match(7, Mode::Open, 0, 0, participants(&[(1, "A"), (2, "B")]))
            .unwrap();

        {
            let mut guard = session.lock().await;
            assert!(guard.watchdog.is_some());
            registry.teardown(&mut guard);
            assert!(guard.watchdog.is_none());
        }
        assert_eq!(registry.registered_count(), 0);
    }
}
