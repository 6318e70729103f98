//! Driving port for ad mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Ad, AdContent, AdDraft, AdId, Error, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAdRequest {
    pub acting_user: UserId,
    pub draft: AdDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAdRequest {
    pub acting_user: UserId,
    pub ad_id: AdId,
    pub draft: AdDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAdRequest {
    pub acting_user: UserId,
    pub ad_id: AdId,
}

/// Create, edit, and remove ads. Only an ad's owner may edit or remove it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdCommand: Send + Sync {
    async fn create_ad(&self, request: CreateAdRequest) -> Result<Ad, Error>;

    async fn update_ad(&self, request: UpdateAdRequest) -> Result<Ad, Error>;

    /// Removing an ad also removes every proposal that references it.
    async fn delete_ad(&self, request: DeleteAdRequest) -> Result<(), Error>;
}

fn validate(draft: AdDraft) -> Result<AdContent, Error> {
    AdContent::try_from(draft).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Validates drafts and echoes them back without storing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdCommand;

#[async_trait]
impl AdCommand for FixtureAdCommand {
    async fn create_ad(&self, request: CreateAdRequest) -> Result<Ad, Error> {
        let content = validate(request.draft)?;
        Ok(Ad::new(
            AdId::random(),
            request.acting_user,
            content,
            DateTime::<Utc>::UNIX_EPOCH,
        ))
    }

    async fn update_ad(&self, request: UpdateAdRequest) -> Result<Ad, Error> {
        let content = validate(request.draft)?;
        Ok(Ad::new(
            request.ad_id,
            request.acting_user,
            content,
            DateTime::<Utc>::UNIX_EPOCH,
        ))
    }

    async fn delete_ad(&self, _request: DeleteAdRequest) -> Result<(), Error> {
        Ok(())
    }
}
