//! In-process adapters for the driven ports.
//!
//! [`MemoryStore`] keeps users, ads, the catalog, and proposals behind one
//! mutex and implements every driven port. It mirrors the PostgreSQL
//! schema's guarantees: foreign keys, cascading ad deletion, the unique ad
//! pair, guarded catalog deletion, and conditional status updates. The server
//! uses it when no database is configured.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AdListFilter, AdRepository, AdRepositoryError, CatalogDeleteOutcome, CatalogRepository,
    CatalogRepositoryError, ExchangeListFilter, ExchangeRepository, ExchangeRepositoryError,
    ResolveOutcome, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    Ad, AdId, CatalogEntry, CatalogKind, ExchangeProposal, ProposalId, ProposalStatus, Slug, User,
    UserId, Username, default_catalog,
};

#[derive(Debug)]
struct Tables {
    users: HashMap<UserId, User>,
    ads: HashMap<AdId, Ad>,
    catalog: BTreeMap<(CatalogKind, Slug), CatalogEntry>,
    proposals: HashMap<ProposalId, ExchangeProposal>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            ads: HashMap::new(),
            catalog: default_catalog()
                .into_iter()
                .map(|entry| ((entry.kind(), entry.slug().clone()), entry))
                .collect(),
            proposals: HashMap::new(),
        }
    }
}

impl Tables {
    fn references(&self, kind: CatalogKind, slug: &Slug) -> bool {
        self.ads.values().any(|ad| {
            let content = ad.content();
            match kind {
                CatalogKind::Category => content.categories().contains(slug),
                CatalogKind::Condition => content.condition() == slug,
            }
        })
    }

    fn owner_of(&self, ad: AdId) -> Option<UserId> {
        self.ads.get(&ad).map(Ad::owner)
    }

    fn matches(&self, proposal: &ExchangeProposal, filter: &ExchangeListFilter) -> bool {
        let owner_matches = |wanted: Option<UserId>, ad: AdId| {
            wanted.is_none_or(|owner| self.owner_of(ad) == Some(owner))
        };
        owner_matches(filter.sender_owner, proposal.sender_ad())
            && owner_matches(filter.receiver_owner, proposal.receiver_ad())
            && filter
                .status
                .is_none_or(|status| proposal.status() == status)
    }
}

/// Shared in-memory store, seeded with the default catalog.
///
/// # Examples
/// ```
/// use swapmeet::domain::ports::UserDirectory;
/// use swapmeet::domain::{User, UserId, Username};
/// use swapmeet::outbound::memory::MemoryStore;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let store = MemoryStore::new();
/// let id = UserId::random();
/// store
///     .upsert(&User::new(id, Username::new("dora").expect("valid")))
///     .await
///     .expect("upsert");
/// assert!(store.exists(&id).await.expect("lookup"));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, query: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables.lock().map_err(|_| query(POISONED))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn exists(&self, id: &UserId) -> Result<bool, UserDirectoryError> {
        let tables = self.lock(UserDirectoryError::query)?;
        Ok(tables.users.contains_key(id))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        let tables = self.lock(UserDirectoryError::query)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserDirectoryError> {
        let tables = self.lock(UserDirectoryError::query)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn upsert(&self, user: &User) -> Result<(), UserDirectoryError> {
        let mut tables = self.lock(UserDirectoryError::query)?;
        let taken = tables
            .users
            .values()
            .any(|other| other.username() == user.username() && other.id() != user.id());
        if taken {
            return Err(UserDirectoryError::query(format!(
                "username {} is already taken",
                user.username()
            )));
        }
        tables.users.insert(*user.id(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl AdRepository for MemoryStore {
    async fn find_by_id(&self, id: &AdId) -> Result<Option<Ad>, AdRepositoryError> {
        let tables = self.lock(AdRepositoryError::query)?;
        Ok(tables.ads.get(id).cloned())
    }

    async fn find_many(&self, ids: &[AdId]) -> Result<Vec<Ad>, AdRepositoryError> {
        let tables = self.lock(AdRepositoryError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.ads.get(id).cloned())
            .collect())
    }

    async fn list(&self, filter: &AdListFilter) -> Result<Vec<Ad>, AdRepositoryError> {
        let tables = self.lock(AdRepositoryError::query)?;
        let mut ads: Vec<Ad> = tables
            .ads
            .values()
            .filter(|ad| filter.matches(ad))
            .cloned()
            .collect();
        ads.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(ads)
    }

    async fn insert(&self, ad: &Ad) -> Result<(), AdRepositoryError> {
        let mut tables = self.lock(AdRepositoryError::query)?;
        if !tables.users.contains_key(&ad.owner()) {
            return Err(AdRepositoryError::query(format!(
                "ad owner {} is not registered",
                ad.owner()
            )));
        }
        if tables.ads.contains_key(&ad.id()) {
            return Err(AdRepositoryError::query(format!("ad {} already exists", ad.id())));
        }
        tables.ads.insert(ad.id(), ad.clone());
        Ok(())
    }

    async fn update(&self, ad: &Ad) -> Result<bool, AdRepositoryError> {
        let mut tables = self.lock(AdRepositoryError::query)?;
        match tables.ads.get_mut(&ad.id()) {
            Some(stored) => {
                *stored = stored.clone().with_content(ad.content().clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &AdId) -> Result<bool, AdRepositoryError> {
        let mut tables = self.lock(AdRepositoryError::query)?;
        if tables.ads.remove(id).is_none() {
            return Ok(false);
        }
        tables
            .proposals
            .retain(|_, proposal| proposal.sender_ad() != *id && proposal.receiver_ad() != *id);
        Ok(true)
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        let tables = self.lock(CatalogRepositoryError::query)?;
        Ok(tables
            .catalog
            .values()
            .filter(|entry| entry.kind() == kind)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        kind: CatalogKind,
        slug: &Slug,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError> {
        let tables = self.lock(CatalogRepositoryError::query)?;
        Ok(tables.catalog.get(&(kind, slug.clone())).cloned())
    }

    async fn unknown_slugs(
        &self,
        kind: CatalogKind,
        slugs: &[Slug],
    ) -> Result<Vec<Slug>, CatalogRepositoryError> {
        let tables = self.lock(CatalogRepositoryError::query)?;
        Ok(slugs
            .iter()
            .filter(|slug| !tables.catalog.contains_key(&(kind, (*slug).clone())))
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: &CatalogEntry) -> Result<(), CatalogRepositoryError> {
        let mut tables = self.lock(CatalogRepositoryError::query)?;
        let key = (entry.kind(), entry.slug().clone());
        if tables.catalog.contains_key(&key) {
            return Err(CatalogRepositoryError::duplicate_slug(
                entry.kind(),
                entry.slug().clone(),
            ));
        }
        tables.catalog.insert(key, entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<bool, CatalogRepositoryError> {
        let mut tables = self.lock(CatalogRepositoryError::query)?;
        match tables.catalog.get_mut(&(entry.kind(), entry.slug().clone())) {
            Some(stored) => {
                *stored = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(
        &self,
        kind: CatalogKind,
        slug: &Slug,
    ) -> Result<CatalogDeleteOutcome, CatalogRepositoryError> {
        let mut tables = self.lock(CatalogRepositoryError::query)?;
        let key = (kind, slug.clone());
        if !tables.catalog.contains_key(&key) {
            return Ok(CatalogDeleteOutcome::Missing);
        }
        if tables.references(kind, slug) {
            return Ok(CatalogDeleteOutcome::InUse);
        }
        tables.catalog.remove(&key);
        Ok(CatalogDeleteOutcome::Deleted)
    }
}

#[async_trait]
impl ExchangeRepository for MemoryStore {
    async fn insert(&self, proposal: &ExchangeProposal) -> Result<(), ExchangeRepositoryError> {
        let mut tables = self.lock(ExchangeRepositoryError::query)?;
        for ad in [proposal.sender_ad(), proposal.receiver_ad()] {
            if !tables.ads.contains_key(&ad) {
                return Err(ExchangeRepositoryError::query(format!(
                    "referenced ad {ad} does not exist"
                )));
            }
        }
        let duplicate = tables.proposals.values().any(|existing| {
            existing.sender_ad() == proposal.sender_ad()
                && existing.receiver_ad() == proposal.receiver_ad()
        });
        if duplicate {
            return Err(ExchangeRepositoryError::duplicate_pair(
                proposal.sender_ad(),
                proposal.receiver_ad(),
            ));
        }
        tables.proposals.insert(proposal.id(), proposal.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ProposalId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError> {
        let tables = self.lock(ExchangeRepositoryError::query)?;
        Ok(tables.proposals.get(id).cloned())
    }

    async fn find_by_pair(
        &self,
        sender_ad: &AdId,
        receiver_ad: &AdId,
    ) -> Result<Option<ExchangeProposal>, ExchangeRepositoryError> {
        let tables = self.lock(ExchangeRepositoryError::query)?;
        Ok(tables
            .proposals
            .values()
            .find(|p| p.sender_ad() == *sender_ad && p.receiver_ad() == *receiver_ad)
            .cloned())
    }

    async fn resolve_pending(
        &self,
        id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<ResolveOutcome, ExchangeRepositoryError> {
        let mut tables = self.lock(ExchangeRepositoryError::query)?;
        let Some(stored) = tables.proposals.get_mut(id) else {
            return Ok(ResolveOutcome::Missing);
        };
        if stored.status().is_terminal() {
            return Ok(ResolveOutcome::NotPending(stored.clone()));
        }
        let resolved = stored
            .clone()
            .transition_to(status)
            .map_err(|err| ExchangeRepositoryError::query(err.to_string()))?;
        *stored = resolved.clone();
        Ok(ResolveOutcome::Resolved(resolved))
    }

    async fn list(
        &self,
        filter: &ExchangeListFilter,
    ) -> Result<Vec<ExchangeProposal>, ExchangeRepositoryError> {
        let tables = self.lock(ExchangeRepositoryError::query)?;
        let mut listed: Vec<ExchangeProposal> = tables
            .proposals
            .values()
            .filter(|proposal| tables.matches(proposal, filter))
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(listed)
    }
}
