//! Driven port onto the identity store.
//!
//! The exchange engine only needs to know whether a target user exists; the
//! login flow also reads and registers accounts through it.

use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user directory query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether a user with `id` is registered.
    async fn exists(&self, id: &UserId) -> Result<bool, UserDirectoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError>;

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserDirectoryError>;

    /// Insert the user or refresh its username.
    async fn upsert(&self, user: &User) -> Result<(), UserDirectoryError>;
}

/// Directory that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn exists(&self, _id: &UserId) -> Result<bool, UserDirectoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }

    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }

    async fn upsert(&self, _user: &User) -> Result<(), UserDirectoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_directory_is_empty() {
        let directory = FixtureUserDirectory;
        let id = UserId::random();
        assert!(!directory.exists(&id).await.expect("fixture lookup"));
        assert!(directory.find_by_id(&id).await.expect("fixture lookup").is_none());
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = UserDirectoryError::connection("timeout");
        assert_eq!(err.to_string(), "user directory connection failed: timeout");
    }
}
