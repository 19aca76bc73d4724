//! Discord event handling.
//!
//! Filters inbound messages down to prefixed match commands and feeds the
//! router; reactions on a watchdog prompt count as a sign of life.

use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::{Message, Reaction};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::arena::registry::MatchRegistry;
use crate::discord::commands::ArenaRouter;

pub struct ArenaHandler {
    router: Arc<ArenaRouter>,
    registry: Arc<MatchRegistry>,
    prefix: String,
}

impl ArenaHandler {
    pub fn new(router: Arc<ArenaRouter>, registry: Arc<MatchRegistry>, prefix: String) -> Self {
        Self {
            router,
            registry,
            prefix,
        }
    }
}

#[async_trait]
impl EventHandler for ArenaHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore our own messages
        if msg.author.id == ctx.cache.current_user().id {
            return;
        }

        // Ignore bots
        if msg.author.bot {
            return;
        }

        // Only handle guild (server) messages
        if msg.guild_id.is_none() {
            return;
        }

        let content = msg.content.trim();
        if content.is_empty() || content.len() > 200 {
            return;
        }
        let Some(stripped) = content.strip_prefix(&self.prefix) else {
            return;
        };

        match self.router.handle_command(&ctx, &msg, stripped).await {
            Ok(_handled) => {}
            Err(e) => error!("Command handler error: {}", e),
        }
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        let Some(user_id) = reaction.user_id else {
            return;
        };
        let Some(session) = self.registry.session_for(user_id.get()) else {
            return;
        };

        let guard = session.lock().await;
        let on_prompt = guard
            .prompt
            .map(|p| p.message == reaction.message_id.get())
            .unwrap_or(false);
        if on_prompt {
            guard.touch();
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);
    }
}
