pub mod account_service;
pub mod chat_service;
pub mod export;
pub mod group_service;
pub mod invitation_service;
pub mod ledger_service;

pub use account_service::{AccountService, RegisterRequest};
pub use chat_service::ChatService;
pub use export::transactions_to_csv;
pub use group_service::GroupService;
pub use invitation_service::InvitationService;
pub use ledger_service::LedgerService;

use crate::error::{AppError, AppResult};
use crate::models::MemberRole;
use crate::repositories::{GroupMemberRepository, GroupRepository};
use uuid::Uuid;

/// Resolve the caller's role in a group.
///
/// `NotFound` when the group does not exist, `Forbidden` when the caller is not a member.
pub(crate) async fn require_membership(
    groups: &GroupRepository,
    members: &GroupMemberRepository,
    group_id: Uuid,
    user_id: Uuid,
) -> AppResult<MemberRole> {
    if groups.find_by_id(group_id).await?.is_none() {
        return Err(AppError::NotFound("Group not found".into()));
    }

    members
        .find_role(group_id, user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Not a member of this group".into()))
}
