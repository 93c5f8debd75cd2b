use super::require_membership;
use crate::auth::{PasswordHasher, RequestContext};
use crate::database::Database;
use crate::error::{AppError, AppResult, Credential, ValidationErrors};
use crate::models::{
    compute_totals, member_contributions, Group, GroupMember, GroupView, MemberContribution,
    MemberDetail, MemberRole, Totals, UserSummary,
};
use crate::repositories::{
    GroupMemberRepository, GroupRepository, GroupTransactionRepository, InvitationRepository,
    Slice, UserRepository,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Service for groups and password-gated membership
pub struct GroupService {
    database: Database,
    group_repo: Arc<GroupRepository>,
    member_repo: Arc<GroupMemberRepository>,
    user_repo: Arc<UserRepository>,
    ledger_repo: Arc<GroupTransactionRepository>,
    hasher: Arc<PasswordHasher>,
}

impl GroupService {
    pub fn new(
        database: Database,
        group_repo: Arc<GroupRepository>,
        member_repo: Arc<GroupMemberRepository>,
        user_repo: Arc<UserRepository>,
        ledger_repo: Arc<GroupTransactionRepository>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            database,
            group_repo,
            member_repo,
            user_repo,
            ledger_repo,
            hasher,
        }
    }

    /// Create a group with the caller as its only admin.
    ///
    /// The group row and the admin membership are committed together.
    pub async fn create_group(
        &self,
        ctx: &RequestContext,
        name: &str,
        bio: &str,
        raw_password: &str,
    ) -> AppResult<Group> {
        let name = name.trim();
        let mut errors = ValidationErrors::new();
        if name.is_empty() {
            errors.push("name", "Group name is required.");
        }
        if raw_password.is_empty() {
            errors.push("password", "Group password is required.");
        }
        errors.into_result()?;

        let password_hash = self.hasher.hash(raw_password)?;
        let group = Group::new(name.to_string(), bio.trim().to_string(), password_hash, ctx.user_id);

        let mut tx = self.database.pool().begin().await?;
        GroupRepository::insert(&mut tx, &group).await?;
        GroupMemberRepository::add_member(&mut tx, group.id, ctx.user_id, MemberRole::Admin).await?;
        tx.commit().await?;

        info!("Created group {} ({}) by {}", group.name, group.id, ctx.user_id);
        Ok(group)
    }

    /// Join a group with its password.
    ///
    /// Joining again is a no-op that returns the existing membership. Any of
    /// the caller's pending invitations to the group are accepted on the way.
    pub async fn verify_and_join(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        raw_password: &str,
    ) -> AppResult<GroupMember> {
        let group = self
            .group_repo
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".into()))?;

        self.hasher
            .require(raw_password, &group.password_hash, Credential::Group)
            .map_err(|e| {
                if let AppError::InvalidCredentials(_) = e {
                    warn!("Wrong group password from {} for group {}", ctx.user_id, group_id);
                }
                e
            })?;

        let mut tx = self.database.pool().begin().await?;
        let inserted =
            GroupMemberRepository::add_member(&mut tx, group_id, ctx.user_id, MemberRole::Member).await?;
        let accepted = InvitationRepository::accept_pending_for(&mut tx, group_id, ctx.user_id).await?;
        let member = GroupMemberRepository::find_in(&mut tx, group_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".into()))?;
        tx.commit().await?;

        if inserted {
            info!(
                "User {} joined group {} ({} invitation(s) accepted)",
                ctx.user_id, group_id, accepted
            );
        } else {
            debug!("User {} already in group {}", ctx.user_id, group_id);
        }
        Ok(member)
    }

    /// Members of a group in join order
    pub async fn list_members(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<Vec<MemberDetail>> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        Ok(self.member_repo.list_details(group_id, Slice::all()).await?)
    }

    pub async fn is_admin(&self, user_id: Uuid, group_id: Uuid) -> AppResult<bool> {
        let role = self.member_repo.find_role(group_id, user_id).await?;
        Ok(role.map(|r| r.is_admin()).unwrap_or(false))
    }

    /// Groups the caller belongs to
    pub async fn list_groups(&self, ctx: &RequestContext) -> AppResult<Vec<GroupView>> {
        Ok(self.group_repo.list_for_user(ctx.user_id, Slice::all()).await?)
    }

    /// A group together with the caller's role in it
    pub async fn open_group(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<GroupView> {
        let group = self
            .group_repo
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".into()))?;
        let role = self
            .member_repo
            .find_role(group_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Not a member of this group".into()))?;
        let member_count = self.member_repo.count_by_group(group_id).await?;

        debug!("User {} opened group {}", ctx.user_id, group_id);
        Ok(GroupView {
            group,
            role,
            member_count,
        })
    }

    /// Income, expense and balance over the whole group ledger
    pub async fn compute_group_balance(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<Totals> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        let entries = self.ledger_repo.list_for_group(group_id, Slice::all()).await?;
        compute_totals(&entries)
    }

    /// What each member contributed and spent
    pub async fn member_contributions(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> AppResult<Vec<MemberContribution>> {
        require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        let entries = self.ledger_repo.list_for_group(group_id, Slice::all()).await?;
        member_contributions(&entries)
    }

    /// Users an admin could invite: name or email matches `term`, not yet a member
    pub async fn search_invitable_users(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        term: &str,
    ) -> AppResult<Vec<UserSummary>> {
        let role = require_membership(&self.group_repo, &self.member_repo, group_id, ctx.user_id).await?;
        if !role.is_admin() {
            return Err(AppError::Forbidden("Only group admins can invite members".into()));
        }

        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .user_repo
            .search_outside_group(group_id, term, Slice::all())
            .await?)
    }
}
