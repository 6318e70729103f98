//! Exchange proposal engine.
//!
//! [`ExchangeService`] implements the exchange driving ports on top of the
//! user directory, the ad registry, and the exchange store. Ownership is read
//! from the registry at validation time; listings join ad summaries in at
//! read time.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AdRepository, AdRepositoryError, ExchangeCommand, ExchangeListFilter, ExchangeQuery,
    ExchangeRepository, ExchangeRepositoryError, GetExchangeRequest, ListReceivedRequest,
    ListSentRequest, ProposeRequest, RespondRequest, ResolveOutcome, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{
    Ad, AdId, Error, ExchangeProposal, ExchangeView, ProposalComment, ProposalId, ProposalStatus,
    TransitionError,
};

fn map_user_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn map_ad_error(error: AdRepositoryError) -> Error {
    match error {
        AdRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ad repository unavailable: {message}"))
        }
        AdRepositoryError::Query { message } => {
            Error::internal(format!("ad repository error: {message}"))
        }
    }
}

fn map_exchange_error(error: ExchangeRepositoryError) -> Error {
    match error {
        ExchangeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("exchange store unavailable: {message}"))
        }
        ExchangeRepositoryError::Query { message } => {
            Error::internal(format!("exchange store error: {message}"))
        }
        ExchangeRepositoryError::DuplicatePair {
            sender_ad,
            receiver_ad,
        } => duplicate_pair(sender_ad, receiver_ad),
    }
}

fn duplicate_pair(sender_ad: AdId, receiver_ad: AdId) -> Error {
    Error::conflict("an exchange proposal for these ads already exists").with_details(json!({
        "senderAd": sender_ad,
        "receiverAd": receiver_ad,
    }))
}

fn map_transition_error(error: TransitionError) -> Error {
    match error {
        TransitionError::NotADecision => {
            Error::invalid_request("status must be either accepted or rejected")
        }
        TransitionError::AlreadyResolved { current } => {
            Error::conflict(format!("exchange proposal was already {current}"))
                .with_details(json!({ "status": current }))
        }
    }
}

fn proposal_not_found(id: ProposalId) -> Error {
    Error::not_found(format!("exchange proposal {id} not found"))
}

fn ad_not_found(id: AdId) -> Error {
    Error::not_found(format!("ad {id} not found"))
}

/// Proposal engine implementing [`ExchangeCommand`] and [`ExchangeQuery`].
#[derive(Clone)]
pub struct ExchangeService<U, A, E> {
    users: Arc<U>,
    ads: Arc<A>,
    exchanges: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<U, A, E> ExchangeService<U, A, E> {
    pub fn new(users: Arc<U>, ads: Arc<A>, exchanges: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            ads,
            exchanges,
            clock,
        }
    }
}

impl<U, A, E> ExchangeService<U, A, E>
where
    U: UserDirectory,
    A: AdRepository,
    E: ExchangeRepository,
{
    async fn load_ad(&self, id: AdId) -> Result<Ad, Error> {
        self.ads
            .find_by_id(&id)
            .await
            .map_err(map_ad_error)?
            .ok_or_else(|| ad_not_found(id))
    }

    async fn load_proposal(&self, id: ProposalId) -> Result<ExchangeProposal, Error> {
        self.exchanges
            .find_by_id(&id)
            .await
            .map_err(map_exchange_error)?
            .ok_or_else(|| proposal_not_found(id))
    }

    /// Join ad summaries onto proposals, dropping proposals whose ads are gone.
    async fn project(&self, proposals: Vec<ExchangeProposal>) -> Result<Vec<ExchangeView>, Error> {
        if proposals.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<AdId> = proposals
            .iter()
            .flat_map(|proposal| [proposal.sender_ad(), proposal.receiver_ad()])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let ads: HashMap<AdId, Ad> = self
            .ads
            .find_many(&ids)
            .await
            .map_err(map_ad_error)?
            .into_iter()
            .map(|ad| (ad.id(), ad))
            .collect();

        let views = proposals
            .into_iter()
            .filter_map(|proposal| {
                match (ads.get(&proposal.sender_ad()), ads.get(&proposal.receiver_ad())) {
                    (Some(sender), Some(receiver)) => Some(ExchangeView {
                        sender_ad: sender.summary(),
                        receiver_ad: receiver.summary(),
                        proposal,
                    }),
                    _ => {
                        warn!(
                            proposal_id = %proposal.id(),
                            sender_ad = %proposal.sender_ad(),
                            receiver_ad = %proposal.receiver_ad(),
                            "skipping exchange proposal with a missing ad"
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(views)
    }

    async fn list(&self, filter: ExchangeListFilter) -> Result<Vec<ExchangeView>, Error> {
        let proposals = self
            .exchanges
            .list(&filter)
            .await
            .map_err(map_exchange_error)?;
        self.project(proposals).await
    }
}

#[async_trait]
impl<U, A, E> ExchangeCommand for ExchangeService<U, A, E>
where
    U: UserDirectory,
    A: AdRepository,
    E: ExchangeRepository,
{
    async fn propose(&self, request: ProposeRequest) -> Result<ExchangeView, Error> {
        let ProposeRequest {
            acting_user,
            target_user,
            sender_ad,
            receiver_ad,
            comment,
        } = request;

        if !self
            .users
            .exists(&target_user)
            .await
            .map_err(map_user_error)?
        {
            return Err(Error::not_found(format!("user {target_user} not found")));
        }

        if acting_user == target_user {
            debug!(user_id = %acting_user, "rejected self-addressed exchange proposal");
            return Err(Error::invalid_request("cannot propose an exchange to yourself"));
        }

        let comment = ProposalComment::new(comment).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "comment" }))
        })?;

        let sender = self.load_ad(sender_ad).await?;
        if !sender.is_owned_by(&acting_user) {
            debug!(user_id = %acting_user, ad_id = %sender_ad, "proposer does not own sender ad");
            return Err(Error::forbidden("you are not the owner of the offered ad"));
        }

        let receiver = self.load_ad(receiver_ad).await?;
        if !receiver.is_owned_by(&target_user) {
            debug!(user_id = %target_user, ad_id = %receiver_ad, "target does not own receiver ad");
            return Err(Error::forbidden(
                "the target user does not own the requested ad",
            ));
        }

        if sender.owner() == receiver.owner() {
            return Err(Error::invalid_request(
                "cannot propose an exchange with your own ad",
            ));
        }

        if self
            .exchanges
            .find_by_pair(&sender_ad, &receiver_ad)
            .await
            .map_err(map_exchange_error)?
            .is_some()
        {
            return Err(duplicate_pair(sender_ad, receiver_ad));
        }

        let proposal = ExchangeProposal::open(
            ProposalId::random(),
            sender_ad,
            receiver_ad,
            comment,
            self.clock.utc(),
        );
        self.exchanges
            .insert(&proposal)
            .await
            .map_err(map_exchange_error)?;

        info!(
            proposal_id = %proposal.id(),
            sender_ad = %sender_ad,
            receiver_ad = %receiver_ad,
            "exchange proposed"
        );

        Ok(ExchangeView {
            proposal,
            sender_ad: sender.summary(),
            receiver_ad: receiver.summary(),
        })
    }

    async fn respond(&self, request: RespondRequest) -> Result<ExchangeView, Error> {
        let RespondRequest {
            acting_user,
            proposal_id,
            status,
        } = request;

        if status == ProposalStatus::Pending {
            return Err(map_transition_error(TransitionError::NotADecision));
        }

        let proposal = self.load_proposal(proposal_id).await?;
        let receiver = self.load_ad(proposal.receiver_ad()).await?;
        if !receiver.is_owned_by(&acting_user) {
            debug!(
                user_id = %acting_user,
                proposal_id = %proposal_id,
                "responder does not own the requested ad"
            );
            return Err(Error::forbidden(
                "only the owner of the requested ad may respond to this proposal",
            ));
        }

        proposal
            .ensure_transition(status)
            .map_err(map_transition_error)?;

        let resolved = match self
            .exchanges
            .resolve_pending(&proposal_id, status)
            .await
            .map_err(map_exchange_error)?
        {
            ResolveOutcome::Resolved(resolved) => resolved,
            ResolveOutcome::NotPending(current) => {
                return Err(map_transition_error(TransitionError::AlreadyResolved {
                    current: current.status(),
                }));
            }
            ResolveOutcome::Missing => return Err(proposal_not_found(proposal_id)),
        };

        let sender = self.load_ad(resolved.sender_ad()).await?;

        info!(
            proposal_id = %proposal_id,
            status = %status,
            "exchange proposal resolved"
        );

        Ok(ExchangeView {
            proposal: resolved,
            sender_ad: sender.summary(),
            receiver_ad: receiver.summary(),
        })
    }
}

#[async_trait]
impl<U, A, E> ExchangeQuery for ExchangeService<U, A, E>
where
    U: UserDirectory,
    A: AdRepository,
    E: ExchangeRepository,
{
    async fn list_sent(&self, request: ListSentRequest) -> Result<Vec<ExchangeView>, Error> {
        self.list(ExchangeListFilter {
            sender_owner: Some(request.acting_user),
            receiver_owner: request.counterpart,
            status: request.status,
        })
        .await
    }

    async fn list_received(
        &self,
        request: ListReceivedRequest,
    ) -> Result<Vec<ExchangeView>, Error> {
        self.list(ExchangeListFilter {
            sender_owner: None,
            receiver_owner: Some(request.acting_user),
            status: request.status,
        })
        .await
    }

    async fn get(&self, request: GetExchangeRequest) -> Result<ExchangeView, Error> {
        // Any authenticated user may read a proposal by id.
        let proposal = self.load_proposal(request.proposal_id).await?;
        let sender = self.load_ad(proposal.sender_ad()).await?;
        let receiver = self.load_ad(proposal.receiver_ad()).await?;
        Ok(ExchangeView {
            proposal,
            sender_ad: sender.summary(),
            receiver_ad: receiver.summary(),
        })
    }
}

#[cfg(test)]
#[path = "exchange_service_tests.rs"]
mod tests;
