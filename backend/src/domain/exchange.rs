//! Exchange proposals and their status state machine.
//!
//! A proposal offers the sender's ad in exchange for the receiver's ad. It is
//! created `pending` and may move exactly once, to `accepted` or `rejected`.
//! Both terminal states are final.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AdId, AdSummary, ProposalId};

/// Maximum comment length in characters.
pub const PROPOSAL_COMMENT_MAX: usize = 512;

/// Lifecycle state of an exchange proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Accepted, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the proposal has left `pending` for good.
    ///
    /// # Examples
    /// ```
    /// use swapmeet::domain::ProposalStatus;
    ///
    /// assert!(!ProposalStatus::Pending.is_terminal());
    /// assert!(ProposalStatus::Rejected.is_terminal());
    /// ```
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown proposal status `{0}`; expected pending, accepted, or rejected")]
pub struct ParseProposalStatusError(String);

impl FromStr for ProposalStatus {
    type Err = ParseProposalStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseProposalStatusError(s.to_owned()))
    }
}

/// Validation error for [`ProposalComment`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalCommentError {
    #[error("comment must not be empty")]
    Empty,
    #[error("comment must be at most {max} characters")]
    TooLong { max: usize },
}

/// Free-text note attached to a proposal when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProposalComment(String);

impl ProposalComment {
    pub fn new(value: impl Into<String>) -> Result<Self, ProposalCommentError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProposalCommentError::Empty);
        }
        if trimmed.chars().count() > PROPOSAL_COMMENT_MAX {
            return Err(ProposalCommentError::TooLong {
                max: PROPOSAL_COMMENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ProposalComment> for String {
    fn from(value: ProposalComment) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProposalComment {
    type Error = ProposalCommentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Rejected state machine edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// `pending` is only ever an initial state.
    #[error("a proposal cannot be moved back to pending")]
    NotADecision,
    /// The proposal already left `pending`.
    #[error("proposal was already {current}")]
    AlreadyResolved { current: ProposalStatus },
}

/// Offer to swap the sender ad for the receiver ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeProposal {
    id: ProposalId,
    sender_ad: AdId,
    receiver_ad: AdId,
    comment: ProposalComment,
    status: ProposalStatus,
    created_at: DateTime<Utc>,
}

impl ExchangeProposal {
    /// Open a new `pending` proposal.
    pub fn open(
        id: ProposalId,
        sender_ad: AdId,
        receiver_ad: AdId,
        comment: ProposalComment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender_ad,
            receiver_ad,
            comment,
            status: ProposalStatus::Pending,
            created_at,
        }
    }

    /// Rebuild a proposal from storage.
    pub fn restore(
        id: ProposalId,
        sender_ad: AdId,
        receiver_ad: AdId,
        comment: ProposalComment,
        status: ProposalStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender_ad,
            receiver_ad,
            comment,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> ProposalId {
        self.id
    }

    pub fn sender_ad(&self) -> AdId {
        self.sender_ad
    }

    pub fn receiver_ad(&self) -> AdId {
        self.receiver_ad
    }

    pub fn comment(&self) -> &ProposalComment {
        &self.comment
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check that `next` is a legal edge from the current status.
    pub fn ensure_transition(&self, next: ProposalStatus) -> Result<(), TransitionError> {
        if next == ProposalStatus::Pending {
            return Err(TransitionError::NotADecision);
        }
        if self.status.is_terminal() {
            return Err(TransitionError::AlreadyResolved {
                current: self.status,
            });
        }
        Ok(())
    }

    /// Apply a status decision, consuming the pending proposal.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use swapmeet::domain::{
    ///     AdId, ExchangeProposal, ProposalComment, ProposalId, ProposalStatus,
    /// };
    ///
    /// let proposal = ExchangeProposal::open(
    ///     ProposalId::random(),
    ///     AdId::random(),
    ///     AdId::random(),
    ///     ProposalComment::new("swap?").expect("valid comment"),
    ///     Utc::now(),
    /// );
    /// let accepted = proposal.transition_to(ProposalStatus::Accepted).expect("pending");
    /// assert!(accepted.transition_to(ProposalStatus::Rejected).is_err());
    /// ```
    pub fn transition_to(self, next: ProposalStatus) -> Result<Self, TransitionError> {
        self.ensure_transition(next)?;
        Ok(Self {
            status: next,
            ..self
        })
    }
}

/// Proposal joined with summaries of both ads at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeView {
    pub proposal: ExchangeProposal,
    pub sender_ad: AdSummary,
    pub receiver_ad: AdSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn pending() -> ExchangeProposal {
        ExchangeProposal::open(
            ProposalId::random(),
            AdId::random(),
            AdId::random(),
            ProposalComment::new("hi").expect("valid comment"),
            Utc::now(),
        )
    }

    #[rstest]
    fn opens_in_pending(pending: ExchangeProposal) {
        assert_eq!(pending.status(), ProposalStatus::Pending);
    }

    #[rstest]
    #[case(ProposalStatus::Accepted)]
    #[case(ProposalStatus::Rejected)]
    fn pending_moves_to_either_decision(pending: ExchangeProposal, #[case] next: ProposalStatus) {
        let id = pending.id();
        let resolved = pending.transition_to(next).expect("legal edge");
        assert_eq!(resolved.status(), next);
        assert_eq!(resolved.id(), id);
    }

    #[rstest]
    fn pending_is_not_a_decision(pending: ExchangeProposal) {
        assert_eq!(
            pending.transition_to(ProposalStatus::Pending),
            Err(TransitionError::NotADecision)
        );
    }

    #[rstest]
    #[case(ProposalStatus::Accepted, ProposalStatus::Rejected)]
    #[case(ProposalStatus::Accepted, ProposalStatus::Accepted)]
    #[case(ProposalStatus::Rejected, ProposalStatus::Accepted)]
    #[case(ProposalStatus::Rejected, ProposalStatus::Rejected)]
    fn terminal_states_are_final(
        pending: ExchangeProposal,
        #[case] first: ProposalStatus,
        #[case] second: ProposalStatus,
    ) {
        let resolved = pending.transition_to(first).expect("legal edge");
        assert_eq!(
            resolved.transition_to(second),
            Err(TransitionError::AlreadyResolved { current: first })
        );
    }

    #[rstest]
    #[case(ProposalStatus::Pending, false)]
    #[case(ProposalStatus::Accepted, true)]
    #[case(ProposalStatus::Rejected, true)]
    fn only_decisions_are_terminal(#[case] status: ProposalStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[rstest]
    #[case("pending", ProposalStatus::Pending)]
    #[case("accepted", ProposalStatus::Accepted)]
    #[case("rejected", ProposalStatus::Rejected)]
    fn status_parses_and_displays_snake_case(#[case] raw: &str, #[case] status: ProposalStatus) {
        assert_eq!(raw.parse::<ProposalStatus>(), Ok(status));
        assert_eq!(status.to_string(), raw);
        assert_eq!(
            serde_json::to_value(status).expect("serialise status"),
            serde_json::json!(raw)
        );
    }

    #[rstest]
    #[case("Accepted")]
    #[case("cancelled")]
    #[case("")]
    fn status_rejects_unknown_values(#[case] raw: &str) {
        assert!(raw.parse::<ProposalStatus>().is_err());
    }

    #[rstest]
    #[case("   ", ProposalCommentError::Empty)]
    #[case("", ProposalCommentError::Empty)]
    fn comment_requires_text(#[case] raw: &str, #[case] expected: ProposalCommentError) {
        assert_eq!(ProposalComment::new(raw), Err(expected));
    }

    #[rstest]
    fn comment_is_bounded() {
        let at_limit = "c".repeat(PROPOSAL_COMMENT_MAX);
        assert!(ProposalComment::new(at_limit.clone()).is_ok());
        assert_eq!(
            ProposalComment::new(format!("{at_limit}c")),
            Err(ProposalCommentError::TooLong {
                max: PROPOSAL_COMMENT_MAX
            })
        );
    }
}
