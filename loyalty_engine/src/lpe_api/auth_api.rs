use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::AuthManagement,
    db_types::{NewUser, User},
    lpe_api::errors::AuthApiError,
};

/// `AuthApi` manages user records. Passwords arrive already hashed; verifying them is up to the caller.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a user with a zero balance.
    pub async fn register(&self, login: &str, password_hash: String) -> Result<User, AuthApiError> {
        let login = login.trim();
        if login.is_empty() || password_hash.is_empty() {
            return Err(AuthApiError::EmptyCredentials);
        }
        let user = self.db.create_user(NewUser { login: login.to_string(), password_hash }).await?;
        info!("🔑️ User #{} registered as '{}'", user.id, user.login);
        Ok(user)
    }

    pub async fn user_by_login(&self, login: &str) -> Result<Option<User>, AuthApiError> {
        let user = self.db.fetch_user_by_login(login.trim()).await?;
        Ok(user)
    }
}
