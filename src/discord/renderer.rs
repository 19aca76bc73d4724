//! Serenity-backed transport.
//!
//! Maps the engine's structured payload onto a Discord embed and owns the
//! short-lived notice cleanup. This is the only place platform markup is
//! produced.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, MessageId, Timestamp,
};
use serenity::async_trait;
use serenity::http::Http;
use tracing::warn;

use crate::arena::render::{MessageHandle, RenderPayload, Transport};
use crate::common::error::{TransportError, TransportResult};
use crate::common::types::ChannelKey;

pub struct EmbedRenderer {
    http: Arc<Http>,
    notice_ttl: Duration,
}

impl EmbedRenderer {
    pub fn new(http: Arc<Http>, notice_ttl: Duration) -> Self {
        Self { http, notice_ttl }
    }

    fn build_embed(payload: &RenderPayload) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(payload.title.clone())
            .description(payload.description.join("\n"))
            .footer(CreateEmbedFooter::new(payload.footer.clone()))
            .colour(payload.color);
        if let Ok(ts) = Timestamp::from_unix_timestamp(payload.timestamp.timestamp()) {
            embed = embed.timestamp(ts);
        }
        for field in &payload.fields {
            embed = embed.field(field.name.clone(), field.value.clone(), true);
        }
        embed
    }
}

#[async_trait]
impl Transport for EmbedRenderer {
    async fn send(
        &self,
        channel: ChannelKey,
        payload: &RenderPayload,
    ) -> TransportResult<MessageHandle> {
        let builder = CreateMessage::new().embed(Self::build_embed(payload));
        ChannelId::new(channel)
            .send_message(&self.http, builder)
            .await
            .map(|m| MessageHandle {
                channel,
                message: m.id.get(),
            })
            .map_err(|e| TransportError::SendFailed {
                message: e.to_string(),
            })
    }

    async fn edit(&self, handle: MessageHandle, payload: &RenderPayload) -> TransportResult<()> {
        let builder = EditMessage::new().embed(Self::build_embed(payload));
        ChannelId::new(handle.channel)
            .edit_message(&self.http, MessageId::new(handle.message), builder)
            .await
            .map(|_| ())
            .map_err(|e| TransportError::EditFailed {
                message: e.to_string(),
            })
    }

    async fn delete(&self, handle: MessageHandle) -> TransportResult<()> {
        ChannelId::new(handle.channel)
            .delete_message(&self.http, MessageId::new(handle.message))
            .await
            .map_err(|e| TransportError::DeleteFailed {
                message: e.to_string(),
            })
    }

    async fn send_text(&self, channel: ChannelKey, text: &str) -> TransportResult<MessageHandle> {
        ChannelId::new(channel)
            .say(&self.http, text)
            .await
            .map(|m| MessageHandle {
                channel,
                message: m.id.get(),
            })
            .map_err(|e| TransportError::SendFailed {
                message: e.to_string(),
            })
    }

    async fn notice(&self, channel: ChannelKey, text: &str) -> TransportResult<()> {
        let message = ChannelId::new(channel)
            .say(&self.http, text)
            .await
            .map_err(|e| TransportError::SendFailed {
                message: e.to_string(),
            })?;

        let http = self.http.clone();
        let ttl = self.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = message.channel_id.delete_message(&http, message.id).await {
                warn!("Failed to clean up notice: {}", e);
            }
        });
        Ok(())
    }
}
