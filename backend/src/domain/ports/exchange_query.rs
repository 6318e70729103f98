//! Driving port for directional exchange reads.

use async_trait::async_trait;

use crate::domain::{Error, ExchangeView, ProposalId, ProposalStatus, UserId};

/// Proposals sent from ads owned by `acting_user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSentRequest {
    pub acting_user: UserId,
    /// Restrict to proposals whose receiver ad belongs to this user.
    pub counterpart: Option<UserId>,
    pub status: Option<ProposalStatus>,
}

/// Proposals received on ads owned by `acting_user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListReceivedRequest {
    pub acting_user: UserId,
    pub status: Option<ProposalStatus>,
}

/// Single proposal lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetExchangeRequest {
    pub acting_user: UserId,
    pub proposal_id: ProposalId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeQuery: Send + Sync {
    async fn list_sent(&self, request: ListSentRequest) -> Result<Vec<ExchangeView>, Error>;

    async fn list_received(
        &self,
        request: ListReceivedRequest,
    ) -> Result<Vec<ExchangeView>, Error>;

    /// Fetch one proposal by id; `not_found` when absent.
    async fn get(&self, request: GetExchangeRequest) -> Result<ExchangeView, Error>;
}

/// Query over an empty exchange store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExchangeQuery;

#[async_trait]
impl ExchangeQuery for FixtureExchangeQuery {
    async fn list_sent(&self, _request: ListSentRequest) -> Result<Vec<ExchangeView>, Error> {
        Ok(Vec::new())
    }

    async fn list_received(
        &self,
        _request: ListReceivedRequest,
    ) -> Result<Vec<ExchangeView>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, request: GetExchangeRequest) -> Result<ExchangeView, Error> {
        Err(Error::not_found(format!(
            "exchange proposal {} not found",
            request.proposal_id
        )))
    }
}
