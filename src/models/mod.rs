//! Domain models for the AccTrack backend.
//!
//! This module contains all database-backed models representing
//! accounts, groups, invitations, ledgers and the group activity feed.

pub mod chat;
pub mod group;
pub mod group_member;
pub mod invitation;
pub mod transaction;
pub mod user;

// Re-export all models for convenient access
pub use chat::{ChatMessage, MAX_MESSAGE_CHARS};
pub use group::{Group, GroupView};
pub use group_member::{GroupMember, MemberDetail, MemberRole};
pub use invitation::{Decision, Invitation, InvitationStatus, PendingInvitation};
pub use transaction::{
    compute_totals, member_contributions, GroupTransaction, LedgerEntry, LedgerSummary,
    MemberContribution, NewTransaction, Totals, Transaction, TransactionInput, TransactionKind,
    MAX_AMOUNT,
};
pub use user::{AccountType, User, UserSummary};
