pub mod chat_repository;
pub mod group_member_repository;
pub mod group_repository;
pub mod group_transaction_repository;
pub mod invitation_repository;
pub mod transaction_repository;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use chat_repository::ChatRepository;
pub use group_member_repository::GroupMemberRepository;
pub use group_repository::GroupRepository;
pub use group_transaction_repository::GroupTransactionRepository;
pub use invitation_repository::InvitationRepository;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;

/// Read window for list queries.
///
/// Every list read takes a `Slice`; callers that want everything pass
/// `Slice::all()`, so paging can be switched on per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Slice {
    /// No limit, no offset
    pub fn all() -> Self {
        Self::default()
    }

    /// At most `limit` rows starting at `offset`
    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    /// Value for a SQLite `LIMIT` clause; negative means unbounded
    pub(crate) fn sql_limit(&self) -> i64 {
        self.limit.map(i64::from).unwrap_or(-1)
    }

    pub(crate) fn sql_offset(&self) -> i64 {
        i64::from(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_limits() {
        assert_eq!(Slice::all().sql_limit(), -1);
        assert_eq!(Slice::all().sql_offset(), 0);
        assert_eq!(Slice::page(20, 40).sql_limit(), 20);
        assert_eq!(Slice::page(20, 40).sql_offset(), 40);
    }
}
