//! Driven port onto the exchange store.
//!
//! Adapters must enforce the unique `(sender_ad, receiver_ad)` pair at the
//! storage layer and resolve a proposal with a single conditional write, so
//! concurrent callers cannot both succeed.

use async_trait::async_trait;

use crate::domain::{AdId, ExchangeProposal, ProposalId, ProposalStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by exchange store adapters.
    pub enum ExchangeRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "exchange store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "exchange store query failed: {message}",
        /// A proposal for the same ordered ad pair already exists.
        DuplicatePair { sender_ad: AdId, receiver_ad: AdId } =>
            "a proposal from ad {sender_ad} to ad {receiver_ad} already exists",
    }
}

/// Directional filter over stored proposals.
///
/// Owner filters join through the ad registry: `sender_owner` matches the
/// owner of the sender ad, `receiver_owner` the owner of the receiver ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeListFilter {
    pub sender_owner: Option<UserId>,
    pub receiver_owner: Option<UserId>,
    pub status: Option<ProposalStatus>,
}

/// Result of a conditional `pending -> decision` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The proposal was pending and now carries the new status.
    Resolved(ExchangeProposal),
    /// The proposal had already left `pending`; it is returned unchanged.
    NotPending(ExchangeProposal),
    /// No proposal with that id exists.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRepository: Send + Sync {
    /// Persist a new proposal. Fails with `DuplicatePair` when the ordered
    /// ad pair is taken.
    async fn insert(&self, proposal: &ExchangeProposal) -> Result<(), ExchangeRepositoryError>;

    async fn find_by_id(
        &self,
        id: &ProposalId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError>;

    async fn find_by_pair(
        &self,
        sender_ad: &AdId,
        receiver_ad: &AdId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError>;

    /// Set `status` only while the stored proposal is still pending.
    async fn resolve_pending(
        &self,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<ResolveOutcome, ExchangeRepositoryError>;

    /// Proposals matching `filter`, oldest first with ties broken by id.
    async fn list(
        &self,
        filter: &ExchangeListFilter,
    ) -> Result<Vec<ExchangeProposal>, ExchangeRepositoryError>;
}

/// Store that accepts writes and never returns anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExchangeRepository;

#[async_trait]
impl ExchangeRepository for FixtureExchangeRepository {
    async fn insert(&self, _proposal: &ExchangeProposal) -> Result<(), ExchangeRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &ProposalId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError> {
        Ok(None)
    }

    async fn find_by_pair(
        &self,
        _sender_ad: &AdId,
        _receiver_ad: &AdId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError> {
        Ok(None)
    }

    async fn resolve_pending(
        &self,
        _id: &ProposalId,
        _status: ProposalStatus,
    ) -> Result<ResolveOutcome, ExchangeRepositoryError> {
        Ok(ResolveOutcome::Missing)
    }

    async fn list(
        &self,
        _filter: &ExchangeListFilter,
    ) -> Result<Vec<ExchangeProposal>, ExchangeRepositoryError> {
        Ok(Vec::new())
    }
}
