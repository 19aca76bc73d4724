//! A live match: the game, its one display message, and the inactivity
//! watchdog.
//!
//! Every session is shared behind `Arc<tokio::sync::Mutex<..>>`, so user
//! commands and the watchdog serialize on the same lock and no mutation
//! ever interleaves. The watchdog is the only autonomous event source: it
//! resets on every successful update, asks for a sign of life after the
//! idle period, and expires the match when the confirmation window passes
//! in silence.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::arena::game::{Game, Outcome};
use crate::arena::registry::MatchRegistry;
use crate::arena::render::{MessageHandle, Transport};
use crate::common::types::ChannelKey;

const PROMPT_TEXT: &str =
    "Still playing? Any match command or a reaction on this message keeps it alive.";

#[derive(Debug)]
pub struct MatchSession {
    pub game: Game,
    pub channel: ChannelKey,
    /// The one live display message, once it exists.
    pub display: Option<MessageHandle>,
    /// The watchdog's confirmation prompt while one is pending.
    pub prompt: Option<MessageHandle>,
    activity_tx: watch::Sender<()>,
    pub watchdog: Option<JoinHandle<()>>,
}

impl MatchSession {
    pub fn new(game: Game, channel: ChannelKey) -> (Self, watch::Receiver<()>) {
        let (activity_tx, activity_rx) = watch::channel(());
        (
            Self {
                game,
                channel,
                display: None,
                prompt: None,
                activity_tx,
                watchdog: None,
            },
            activity_rx,
        )
    }

    /// Signal activity; the watchdog restarts its idle timer.
    pub fn touch(&self) {
        let _ = self.activity_tx.send(());
    }

    /// Re-render the match into its display message and reset the
    /// watchdog. State is already advanced when this runs; a transport
    /// failure is reported inline and never rolled back.
    pub async fn update(&mut self, transport: &dyn Transport) {
        self.push_display(transport).await;
        self.touch();
    }

    /// Drop the current display message and post a fresh one.
    pub async fn repost(&mut self, transport: &dyn Transport) {
        if let Some(handle) = self.display.take() {
            if let Err(e) = transport.delete(handle).await {
                warn!("Failed to delete old display message: {}", e);
            }
        }
        self.update(transport).await;
    }

    /// Final render for a match that has entered its ending state. Does
    /// not feed the watchdog; the match is done.
    pub async fn finish(&mut self, transport: &dyn Transport) {
        if let Some(prompt) = self.prompt.take() {
            let _ = transport.delete(prompt).await;
        }
        self.push_display(transport).await;
    }

    async fn push_display(&mut self, transport: &dyn Transport) {
        let payload = self.game.render();
        let result = match self.display {
            Some(handle) => transport.edit(handle, &payload).await,
            None => match transport.send(self.channel, &payload).await {
                Ok(handle) => {
                    self.display = Some(handle);
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };
        if let Err(e) = result {
            warn!("Display update failed: {}", e);
            let _ = transport.notice(self.channel, &e.to_string()).await;
        }
    }
}

/// Spawn the per-match inactivity watchdog.
///
/// Two stages: after `idle` without activity it posts a confirmation
/// prompt, then waits `confirm` for any sign of life. Unconfirmed, the
/// match is expired and torn down. The task holds only a weak reference
/// and checks the ending flag after every wakeup, so it never acts on a
/// match that finished while it slept.
pub fn spawn_watchdog(
    session: Weak<Mutex<MatchSession>>,
    registry: Arc<MatchRegistry>,
    transport: Arc<dyn Transport>,
    idle: Duration,
    confirm: Duration,
    mut activity: watch::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = activity.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    continue;
                }
                _ = tokio::time::sleep(idle) => {}
            }

            let Some(strong) = session.upgrade() else { return };
            {
                let mut s = strong.lock().await;
                if s.game.ending {
                    return;
                }
                match transport.send_text(s.channel, PROMPT_TEXT).await {
                    Ok(handle) => s.prompt = Some(handle),
                    Err(e) => warn!("Failed to post inactivity prompt: {}", e),
                }
            }
            drop(strong);

            let confirmed = tokio::select! {
                changed = activity.changed() => changed.is_ok(),
                _ = tokio::time::sleep(confirm) => false,
            };

            let Some(strong) = session.upgrade() else { return };
            let mut s = strong.lock().await;
            if let Some(prompt) = s.prompt.take() {
                let _ = transport.delete(prompt).await;
            }
            if s.game.ending {
                return;
            }
            if confirmed {
                continue;
            }

            info!("Expiring match in channel {} after inactivity", s.channel);
            s.game.begin_ending(Outcome::Expired);
            s.finish(transport.as_ref()).await;
            registry.teardown(&mut s);
            return;
        }
    })
}
