//! Discord bot setup and connection.
//!
//! Wires the renderer, registry, and router together and builds the
//! serenity client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serenity::http::Http;
use serenity::prelude::*;
use tracing::info;

use crate::arena::registry::MatchRegistry;
use crate::arena::render::Transport;
use crate::config::Config;
use crate::discord::commands::ArenaRouter;
use crate::discord::handler::ArenaHandler;
use crate::discord::renderer::EmbedRenderer;

pub struct BotBuilder {
    token: String,
    config: Config,
}

pub struct StagekeeperBot {
    client: Client,
}

impl BotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            token: config.discord.token.clone(),
            config,
        }
    }

    pub async fn build(self) -> Result<StagekeeperBot> {
        let http = Arc::new(Http::new(&self.token));
        let transport: Arc<dyn Transport> = Arc::new(EmbedRenderer::new(
            http,
            Duration::from_secs(self.config.arena.notice_ttl_secs),
        ));

        let registry = MatchRegistry::new(
            transport.clone(),
            Duration::from_secs(self.config.arena.idle_timeout_secs),
            Duration::from_secs(self.config.arena.confirm_timeout_secs),
        );

        let router = Arc::new(ArenaRouter::new(
            registry.clone(),
            transport,
            self.config.arena.clone(),
        ));
        let handler = ArenaHandler::new(
            router,
            registry,
            self.config.discord.command_prefix.clone(),
        );

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT;

        let client = Client::builder(&self.token, intents)
            .event_handler(handler)
            .await?;

        info!("Discord client built");
        Ok(StagekeeperBot { client })
    }
}

impl StagekeeperBot {
    /// Run until the gateway connection ends.
    pub async fn run(&mut self) -> Result<()> {
        self.client.start().await?;
        Ok(())
    }
}
