use super::require_membership;
use crate::auth::RequestContext;
use crate::error::{AppError, AppResult};
use crate::models::{ChatMessage, MAX_MESSAGE_CHARS};
use crate::repositories::{ChatRepository, GroupMemberRepository, GroupRepository, Slice};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Service for a group's chat feed
pub struct ChatService {
    chat_repo: Arc<ChatRepository>,
    group_repo: Arc<GroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
}

impl ChatService {
    pub fn new(
        chat_repo: Arc<ChatRepository>,
        group_repo: Arc<GroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
    ) -> Self {
        Self {
            chat_repo,
            group_repo,
            member_repo,
        }
    }

    /// Post to a group's feed. The body is stored as typed; escaping is left to the renderer.
    pub async fn post_message(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        body: &str,
    ) -> AppResult<ChatMessage> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;

        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::validation("message", "Message cannot be empty."));
        }
        if body.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::validation(
                "message",
                format!("Message must be at most {} characters.", MAX_MESSAGE_CHARS),
            ));
        }

        let message = self.chat_repo.create(group_id, ctx.user_id, body).await?;
        debug!("User {} posted message {} in group {}", ctx.user_id, message.id, group_id);
        Ok(message)
    }

    /// A group's messages, oldest first
    pub async fn list_messages(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        slice: Slice,
    ) -> AppResult<Vec<ChatMessage>> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        Ok(self.chat_repo.list_for_group(group_id, slice).await?)
    }
}
