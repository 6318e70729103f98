//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the marketplace entities (users, ads, exchange proposals)
//! and the services that enforce their invariants. Nothing here depends on
//! HTTP or storage types; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId / AdId / ProposalId: UUID identifiers.
//! - Ad / AdSummary: classified ads and their listing projection.
//! - CatalogEntry / CatalogKind: the categories and conditions ads use.
//! - ExchangeProposal / ProposalStatus / ExchangeView: the proposal state
//!   machine and its read model.
//! - ExchangeService / AdService / CatalogService / DirectoryLoginService:
//!   port implementations.

pub mod ad_service;
pub mod ads;
pub mod auth;
pub mod catalog;
pub mod catalog_service;
pub mod error;
pub mod exchange;
pub mod exchange_service;
pub mod ids;
pub mod login;
pub mod ports;
pub mod slug;
pub mod trace_id;
pub mod user;

pub use self::ad_service::AdService;
pub use self::ads::{
    AD_DESCRIPTION_MAX, AD_IMAGE_URL_MAX, AD_TITLE_MAX, Ad, AdContent, AdDraft, AdSummary,
    AdValidationError,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalog::{
    CATALOG_TITLE_MAX, CatalogEntry, CatalogKind, CatalogValidationError, DEFAULT_CATALOG,
    ParseCatalogKindError, default_catalog,
};
pub use self::catalog_service::CatalogService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::exchange::{
    ExchangeProposal, ExchangeView, PROPOSAL_COMMENT_MAX, ParseProposalStatusError,
    ProposalComment, ProposalCommentError, ProposalStatus, TransitionError,
};
pub use self::exchange_service::ExchangeService;
pub use self::ids::{AdId, IdValidationError, ProposalId, UserId};
pub use self::login::DirectoryLoginService;
pub use self::slug::{SLUG_MAX, Slug, SlugValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserValidationError, Username};
