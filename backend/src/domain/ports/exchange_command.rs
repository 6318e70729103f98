//! Driving port for exchange proposal mutations.
//!
//! Every request names the acting user explicitly; adapters derive it from
//! their own session handling before calling in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AdId, AdSummary, Error, ExchangeProposal, ExchangeView, ProposalComment, ProposalId,
    ProposalStatus, Slug, UserId,
};

/// Offer `sender_ad` (owned by `acting_user`) for `receiver_ad` (owned by
/// `target_user`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeRequest {
    pub acting_user: UserId,
    pub target_user: UserId,
    pub sender_ad: AdId,
    pub receiver_ad: AdId,
    pub comment: String,
}

/// Accept or reject a pending proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondRequest {
    pub acting_user: UserId,
    pub proposal_id: ProposalId,
    pub status: ProposalStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeCommand: Send + Sync {
    /// Create a pending proposal.
    ///
    /// Fails with `not_found` for an unknown target user or ad,
    /// `invalid_request` for self-proposals or a bad comment, `forbidden` when
    /// either ad has the wrong owner, and `conflict` when the ad pair has
    /// already been proposed.
    async fn propose(&self, request: ProposeRequest) -> Result<ExchangeView, Error>;

    /// Move a pending proposal to `accepted` or `rejected`.
    ///
    /// Only the receiver ad's owner may respond. Responding to a resolved
    /// proposal fails with `conflict`.
    async fn respond(&self, request: RespondRequest) -> Result<ExchangeView, Error>;
}

fn fixture_summary(id: AdId, owner: UserId) -> Result<AdSummary, Error> {
    let slug = |raw: &str| {
        Slug::new(raw).map_err(|err| Error::internal(format!("invalid fixture slug: {err}")))
    };
    Ok(AdSummary {
        id,
        owner,
        title: "Fixture ad".to_owned(),
        description: "Fixture ad used by adapter tests".to_owned(),
        image_url: None,
        categories: vec![slug("misc")?],
        condition: slug("used")?,
    })
}

fn fixture_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Command that echoes the request back as a freshly opened or resolved
/// proposal without touching storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExchangeCommand;

#[async_trait]
impl ExchangeCommand for FixtureExchangeCommand {
    async fn propose(&self, request: ProposeRequest) -> Result<ExchangeView, Error> {
        let comment = ProposalComment::new(request.comment)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let proposal = ExchangeProposal::open(
            ProposalId::random(),
            request.sender_ad,
            request.receiver_ad,
            comment,
            fixture_timestamp(),
        );
        Ok(ExchangeView {
            proposal,
            sender_ad: fixture_summary(request.sender_ad, request.acting_user)?,
            receiver_ad: fixture_summary(request.receiver_ad, request.target_user)?,
        })
    }

    async fn respond(&self, request: RespondRequest) -> Result<ExchangeView, Error> {
        let comment = ProposalComment::new("fixture")
            .map_err(|err| Error::internal(format!("invalid fixture comment: {err}")))?;
        let sender_ad = AdId::random();
        let receiver_ad = AdId::random();
        let proposal = ExchangeProposal::open(
            request.proposal_id,
            sender_ad,
            receiver_ad,
            comment,
            fixture_timestamp(),
        )
        .transition_to(request.status)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(ExchangeView {
            proposal,
            sender_ad: fixture_summary(sender_ad, UserId::random())?,
            receiver_ad: fixture_summary(receiver_ad, request.acting_user)?,
        })
    }
}
