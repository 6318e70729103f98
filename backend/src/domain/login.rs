//! Login service backed by the user directory.
//!
//! Development accounts authenticate with the shared password and are
//! registered in the directory on first login, so ads and proposals can
//! reference them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{LoginService, UserDirectory, UserDirectoryError, dev_account};
use crate::domain::{Error, LoginCredentials, User, UserId, Username};

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct DirectoryLoginService<U> {
    users: Arc<U>,
}

impl<U> DirectoryLoginService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U: UserDirectory> LoginService for DirectoryLoginService<U> {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some((name, id)) = dev_account(credentials) else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        let username = Username::new(name)
            .map_err(|err| Error::internal(format!("invalid account username: {err}")))?;
        self.users
            .upsert(&User::new(id, username))
            .await
            .map_err(map_directory_error)?;
        info!(user_id = %id, "user logged in");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{DEV_ACCOUNTS, MockUserDirectory};

    #[rstest]
    #[tokio::test]
    async fn registers_dev_account_on_login() {
        let (name, expected) = DEV_ACCOUNTS[1];
        let mut users = MockUserDirectory::new();
        users
            .expect_upsert()
            .withf(move |user| *user.id() == expected && user.username().as_ref() == name)
            .times(1)
            .returning(|_| Ok(()));
        let service = DirectoryLoginService::new(Arc::new(users));
        let creds = LoginCredentials::try_from_parts(name, "password").expect("credentials");

        let id = service.authenticate(&creds).await.expect("login succeeds");

        assert_eq!(id, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_unauthorized_without_registration() {
        let mut users = MockUserDirectory::new();
        users.expect_upsert().times(0);
        let service = DirectoryLoginService::new(Arc::new(users));
        let creds = LoginCredentials::try_from_parts("alice", "hunter2").expect("credentials");

        let err = service.authenticate(&creds).await.expect_err("bad password");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn directory_outage_is_service_unavailable() {
        let mut users = MockUserDirectory::new();
        users
            .expect_upsert()
            .returning(|_| Err(UserDirectoryError::connection("down")));
        let service = DirectoryLoginService::new(Arc::new(users));
        let creds = LoginCredentials::try_from_parts("carol", "password").expect("credentials");

        let err = service.authenticate(&creds).await.expect_err("directory down");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
