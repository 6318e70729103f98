//! Driving port for ad reads.

use async_trait::async_trait;

use crate::domain::{Ad, AdId, Error};

use super::AdListFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdQuery: Send + Sync {
    /// Fetch one ad; `not_found` when absent.
    async fn get_ad(&self, id: AdId) -> Result<Ad, Error>;

    /// Ads passing `filter`, newest first.
    async fn list_ads(&self, filter: AdListFilter) -> Result<Vec<Ad>, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdQuery;

#[async_trait]
impl AdQuery for FixtureAdQuery {
    async fn get_ad(&self, id: AdId) -> Result<Ad, Error> {
        Err(Error::not_found(format!("ad {id} not found")))
    }

    async fn list_ads(&self, _filter: AdListFilter) -> Result<Vec<Ad>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn fixture_query_is_empty() {
        let ads = FixtureAdQuery
            .list_ads(AdListFilter::default())
            .await
            .expect("list");
        assert!(ads.is_empty());
        let err = FixtureAdQuery
            .get_ad(AdId::random())
            .await
            .expect_err("no ads");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
