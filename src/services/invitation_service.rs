use crate::auth::{PasswordHasher, RequestContext};
use crate::database::Database;
use crate::error::{AppError, AppResult, Credential};
use crate::models::{Decision, Invitation, MemberRole, PendingInvitation};
use crate::repositories::{
    GroupMemberRepository, GroupRepository, InvitationRepository, Slice, UserRepository,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Service for the invite, accept and reject workflow
pub struct InvitationService {
    database: Database,
    invitation_repo: Arc<InvitationRepository>,
    group_repo: Arc<GroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
}

impl InvitationService {
    pub fn new(
        database: Database,
        invitation_repo: Arc<InvitationRepository>,
        group_repo: Arc<GroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            database,
            invitation_repo,
            group_repo,
            member_repo,
            user_repo,
            hasher,
        }
    }

    /// Invite a user into a group. Only admins may invite.
    pub async fn invite(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        invitee_id: Uuid,
    ) -> AppResult<Invitation> {
        if self.group_repo.find_by_id(group_id).await?.is_none() {
            return Err(AppError::NotFound("Group not found".into()));
        }

        let role = self.member_repo.find_role(group_id, ctx.user_id).await?;
        if !role.map(|r| r.is_admin()).unwrap_or(false) {
            warn!("Non-admin {} tried to invite into group {}", ctx.user_id, group_id);
            return Err(AppError::Forbidden("Only group admins can invite members".into()));
        }

        if self.user_repo.find_by_id(invitee_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }
        if self.member_repo.is_member(group_id, invitee_id).await? {
            return Err(AppError::Conflict("User is already a member of this group".into()));
        }

        let invitation = Invitation::new(group_id, ctx.user_id, invitee_id);
        self.invitation_repo.create(&invitation).await?;

        info!(
            "User {} invited {} to group {} (invitation {})",
            ctx.user_id, invitee_id, group_id, invitation.id
        );
        Ok(invitation)
    }

    /// Accept or reject an invitation addressed to the caller.
    ///
    /// Accepting checks the group password before anything is written; a
    /// mismatch leaves the invitation pending so it can be retried. The
    /// membership insert and the status change commit together.
    pub async fn respond(
        &self,
        ctx: &RequestContext,
        invitation_id: Uuid,
        decision: Decision,
        raw_password: Option<&str>,
    ) -> AppResult<Invitation> {
        let invitation = self.find_invitation(ctx, invitation_id).await?;
        ensure_open(&invitation)?;

        if decision == Decision::Accept {
            let group = self
                .group_repo
                .find_by_id(invitation.group_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Group not found".into()))?;

            self.hasher
                .require(raw_password.unwrap_or(""), &group.password_hash, Credential::Group)
                .map_err(|e| {
                    if let AppError::InvalidCredentials(_) = e {
                        warn!(
                            "Wrong group password from {} on invitation {}",
                            ctx.user_id, invitation_id
                        );
                    }
                    e
                })?;
        }

        let mut tx = self.database.pool().begin().await?;

        // Another response may have landed while the password was checked
        let mut invitation = InvitationRepository::find_for_invitee(&mut tx, invitation_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".into()))?;
        ensure_open(&invitation)?;

        if decision == Decision::Accept {
            let inserted = GroupMemberRepository::add_member(
                &mut tx,
                invitation.group_id,
                ctx.user_id,
                MemberRole::Member,
            )
            .await?;
            if !inserted {
                debug!("User {} already in group {}", ctx.user_id, invitation.group_id);
            }
        }

        let status = decision.outcome();
        if !InvitationRepository::resolve(&mut tx, invitation.id, status).await? {
            return Err(AppError::Conflict("invitation is no longer pending".into()));
        }
        tx.commit().await?;

        invitation.status = status;
        invitation.is_seen = true;
        info!(
            "Invitation {} {} by {}",
            invitation.id, invitation.status, ctx.user_id
        );
        Ok(invitation)
    }

    /// Mark the caller's invitations as seen. Ids belonging to others are ignored.
    pub async fn mark_seen(&self, ctx: &RequestContext, ids: &[Uuid]) -> AppResult<u64> {
        let updated = self.invitation_repo.mark_seen(ctx.user_id, ids).await?;
        debug!("Marked {} invitation(s) seen for {}", updated, ctx.user_id);
        Ok(updated)
    }

    /// Pending invitations for the caller, oldest first
    pub async fn list_pending(&self, ctx: &RequestContext) -> AppResult<Vec<PendingInvitation>> {
        Ok(self.invitation_repo.list_pending(ctx.user_id, Slice::all()).await?)
    }

    /// Number of pending invitations the caller has not seen
    pub async fn unseen_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        Ok(self.invitation_repo.count_unseen(ctx.user_id).await?)
    }

    /// Current state of one of the caller's invitations
    pub async fn find_invitation(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Invitation> {
        match self.invitation_repo.find_by_id(id).await? {
            Some(invitation) if invitation.invitee_id == ctx.user_id => Ok(invitation),
            _ => Err(AppError::NotFound("Invitation not found".into())),
        }
    }
}

fn ensure_open(invitation: &Invitation) -> AppResult<()> {
    if invitation.status.is_terminal() {
        Err(AppError::Conflict(format!("invitation already {}", invitation.status)))
    } else {
        Ok(())
    }
}
