use crate::{
    db::traits::LedgerError,
    db_types::{NewUser, User},
};

/// The `AuthManagement` trait defines behaviour for managing user records.
///
/// Password hashing and token handling are done by the server. The ledger only stores the hash.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Creates a new user, along with a zeroed balance row, atomically. Fails with [`LedgerError::LoginTaken`] if the
    /// login is in use.
    async fn create_user(&self, user: NewUser) -> Result<User, LedgerError>;

    async fn fetch_user_by_login(&self, login: &str) -> Result<Option<User>, LedgerError>;
}
