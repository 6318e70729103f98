//! Driving port for login.
//!
//! Credential storage is outside this service's scope: accounts are a fixed
//! set of development users sharing one password. Inbound adapters only see
//! the port, so a real identity provider can replace it without touching
//! handlers.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, LoginCredentials, UserId};

/// Password shared by every development account.
pub const DEV_PASSWORD: &str = "password";

/// Development account allowed to curate the catalog.
pub const DEV_STAFF: UserId =
    UserId::from_uuid(Uuid::from_u128(0xd41f_0c6a_2b9e_4c7d_a358_e07b_6f19_82c4));

/// Development accounts as `(username, user id)` pairs.
pub const DEV_ACCOUNTS: [(&str, UserId); 4] = [
    (
        "alice",
        UserId::from_uuid(Uuid::from_u128(0x3fa8_5f64_5717_4562_b3fc_2c96_3f66_afa6)),
    ),
    (
        "bob",
        UserId::from_uuid(Uuid::from_u128(0x9c1e_7b2a_0d4f_4e3b_8a61_5f0c_2d7e_9b14)),
    ),
    (
        "carol",
        UserId::from_uuid(Uuid::from_u128(0x5b2d_8e41_c3a7_4f90_9e16_7a4b_0c8d_3f25)),
    ),
    ("admin", DEV_STAFF),
];

/// Match credentials against [`DEV_ACCOUNTS`].
pub fn dev_account(credentials: &LoginCredentials) -> Option<(&'static str, UserId)> {
    if credentials.password() != DEV_PASSWORD {
        return None;
    }
    DEV_ACCOUNTS
        .into_iter()
        .find(|(username, _)| *username == credentials.username())
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Authenticates development accounts without registering them anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        dev_account(credentials)
            .map(|(_, id)| id)
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}
