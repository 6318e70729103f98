//! PostgreSQL-backed [`ExchangeRepository`].
//!
//! The unique ad pair is enforced by the `exchange_proposals_pair_key`
//! constraint, and responses use a single `UPDATE ... WHERE status =
//! 'pending'` so concurrent decisions cannot both win.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    ExchangeListFilter, ExchangeRepository, ExchangeRepositoryError, ResolveOutcome,
};
use crate::domain::{AdId, ExchangeProposal, ProposalComment, ProposalId, ProposalStatus};

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProposalRow, ProposalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ads, exchange_proposals};

const PAIR_CONSTRAINT: &str = "exchange_proposals_pair_key";

#[derive(Clone)]
pub struct DieselExchangeRepository {
    pool: DbPool,
}

impl DieselExchangeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExchangeRepositoryError {
    map_basic_pool_error(error, ExchangeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExchangeRepositoryError {
    map_basic_diesel_error(
        error,
        ExchangeRepositoryError::query,
        ExchangeRepositoryError::connection,
    )
}

fn row_to_proposal(row: ProposalRow) -> Result<ExchangeProposal, ExchangeRepositoryError> {
    let ProposalRow {
        id,
        ad_sender_id,
        ad_receiver_id,
        comment,
        status,
        created_at,
    } = row;

    let comment = ProposalComment::new(comment).map_err(|err| {
        ExchangeRepositoryError::query(format!("stored proposal {id} has invalid comment: {err}"))
    })?;
    let status = status.parse::<ProposalStatus>().map_err(|err| {
        ExchangeRepositoryError::query(format!("stored proposal {id} has invalid status: {err}"))
    })?;

    Ok(ExchangeProposal::restore(
        ProposalId::from_uuid(id),
        AdId::from_uuid(ad_sender_id),
        AdId::from_uuid(ad_receiver_id),
        comment,
        status,
        created_at,
    ))
}

#[async_trait]
impl ExchangeRepository for DieselExchangeRepository {
    async fn insert(&self, proposal: &ExchangeProposal) -> Result<(), ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProposalRow {
            id: *proposal.id().as_uuid(),
            ad_sender_id: *proposal.sender_ad().as_uuid(),
            ad_receiver_id: *proposal.receiver_ad().as_uuid(),
            comment: proposal.comment().as_str(),
            status: proposal.status().as_str(),
            created_at: proposal.created_at(),
        };
        diesel::insert_into(exchange_proposals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, PAIR_CONSTRAINT) {
                    ExchangeRepositoryError::duplicate_pair(
                        proposal.sender_ad(),
                        proposal.receiver_ad(),
                    )
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(
        &self,
        id: &ProposalId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = exchange_proposals::table
            .filter(exchange_proposals::id.eq(id.as_uuid()))
            .select(ProposalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_proposal).transpose()
    }

    async fn find_by_pair(
        &self,
        sender_ad: &AdId,
        receiver_ad: &AdId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = exchange_proposals::table
            .filter(exchange_proposals::ad_sender_id.eq(sender_ad.as_uuid()))
            .filter(exchange_proposals::ad_receiver_id.eq(receiver_ad.as_uuid()))
            .select(ProposalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_proposal).transpose()
    }

    async fn resolve_pending(
        &self,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<ResolveOutcome, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            exchange_proposals::table
                .filter(exchange_proposals::id.eq(id.as_uuid()))
                .filter(exchange_proposals::status.eq(ProposalStatus::Pending.as_str())),
        )
        .set(exchange_proposals::status.eq(status.as_str()))
        .returning(ProposalRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return row_to_proposal(row).map(ResolveOutcome::Resolved);
        }

        // Nothing matched: either the id is unknown or the proposal has
        // already been resolved.
        let current = exchange_proposals::table
            .filter(exchange_proposals::id.eq(id.as_uuid()))
            .select(ProposalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match current {
            Some(row) => row_to_proposal(row).map(ResolveOutcome::NotPending),
            None => Ok(ResolveOutcome::Missing),
        }
    }

    async fn list(
        &self,
        filter: &ExchangeListFilter,
    ) -> Result<Vec<ExchangeProposal>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = exchange_proposals::table
            .select(ProposalRow::as_select())
            .into_boxed();

        if let Some(owner) = filter.sender_owner {
            query = query.filter(
                exchange_proposals::ad_sender_id.eq_any(
                    ads::table
                        .filter(ads::user_id.eq(*owner.as_uuid()))
                        .select(ads::id),
                ),
            );
        }
        if let Some(owner) = filter.receiver_owner {
            query = query.filter(
                exchange_proposals::ad_receiver_id.eq_any(
                    ads::table
                        .filter(ads::user_id.eq(*owner.as_uuid()))
                        .select(ads::id),
                ),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(exchange_proposals::status.eq(status.as_str()));
        }

        let rows: Vec<ProposalRow> = query
            .order((
                exchange_proposals::created_at.asc(),
                exchange_proposals::id.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_proposal).collect()
    }
}
