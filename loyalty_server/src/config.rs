use std::{env, time::Duration};

use log::*;
use loyalty_engine::{db::sqlite::DEFAULT_SQLITE_DB_URL, ReconcilerConfig, MAX_POLL_INTERVAL};
use lpg_common::{
    helpers::{env_duration, env_or_default},
    Secret,
};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_LPG_HOST: &str = "127.0.0.1";
const DEFAULT_LPG_PORT: u16 = 8080;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_ACCRUAL_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
const DEFAULT_TOKEN_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
const MIN_TOKEN_SECRET_LENGTH: usize = 16;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub reconciliation: ReconciliationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LPG_HOST.to_string(),
            port: DEFAULT_LPG_PORT,
            database_url: DEFAULT_SQLITE_DB_URL.to_string(),
            auth: AuthConfig::default(),
            reconciliation: ReconciliationConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("LPG_HOST").ok().unwrap_or_else(|| DEFAULT_LPG_HOST.into());
        let port = env_or_default("LPG_PORT", DEFAULT_LPG_PORT);
        let database_url = env::var("LPG_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ LPG_DATABASE_URL is not set. Using {DEFAULT_SQLITE_DB_URL}.");
            DEFAULT_SQLITE_DB_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let reconciliation = ReconciliationConfig::from_env_or_default();
        Self { host, port, database_url, auth, reconciliation }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The key used to sign and verify access tokens.
    pub token_secret: Secret<String>,
    /// How long an access token is valid for after it is issued.
    pub token_expiry: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The access token secret has not been set. I'm using a random value for this session. Every \
             access token will be invalidated when the server restarts. Set LPG_TOKEN_SECRET to avoid this. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
        Self { token_secret: Secret::new(secret), token_expiry: DEFAULT_TOKEN_EXPIRY }
    }
}

impl AuthConfig {
    pub fn new(token_secret: &str, token_expiry: Duration) -> Self {
        Self { token_secret: Secret::new(token_secret.to_string()), token_expiry }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("LPG_TOKEN_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [LPG_TOKEN_SECRET]")))?;
        if secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "LPG_TOKEN_SECRET must be at least {MIN_TOKEN_SECRET_LENGTH} characters long"
            )));
        }
        let token_expiry = env_duration("LPG_TOKEN_EXPIRY", DEFAULT_TOKEN_EXPIRY, 3600);
        Ok(Self { token_secret: Secret::new(secret), token_expiry })
    }
}

//-------------------------------------------------  ReconciliationConfig  ---------------------------------------------
#[derive(Clone, Debug)]
pub struct ReconciliationConfig {
    /// The base address of the accrual system. When `None`, the reconciliation worker does not run.
    pub accrual_system_address: Option<String>,
    pub poll_interval: Duration,
    /// Upper bound on a single accrual query
    pub accrual_timeout: Duration,
    /// How long the worker may take to wind down on shutdown before it is aborted
    pub shutdown_grace: Duration,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            accrual_system_address: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            accrual_timeout: DEFAULT_ACCRUAL_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl ReconciliationConfig {
    pub fn from_env_or_default() -> Self {
        let accrual_system_address =
            env::var("LPG_ACCRUAL_SYSTEM_ADDRESS").ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        if accrual_system_address.is_none() {
            warn!("🪛️ LPG_ACCRUAL_SYSTEM_ADDRESS is not set. Uploaded orders will not be reconciled.");
        }
        let poll_interval = env_duration("LPG_POLL_INTERVAL", DEFAULT_POLL_INTERVAL, 1);
        let poll_interval = if poll_interval.is_zero() {
            warn!("🪛️ LPG_POLL_INTERVAL must be at least one second. Using the default of {DEFAULT_POLL_INTERVAL:?}.");
            DEFAULT_POLL_INTERVAL
        } else if poll_interval > MAX_POLL_INTERVAL {
            warn!("🪛️ LPG_POLL_INTERVAL is longer than {MAX_POLL_INTERVAL:?}. Using {MAX_POLL_INTERVAL:?} instead.");
            MAX_POLL_INTERVAL
        } else {
            poll_interval
        };
        let accrual_timeout = env_duration("LPG_ACCRUAL_TIMEOUT", DEFAULT_ACCRUAL_TIMEOUT, 1);
        let shutdown_grace = env_duration("LPG_SHUTDOWN_GRACE", DEFAULT_SHUTDOWN_GRACE, 1);
        Self { accrual_system_address, poll_interval, accrual_timeout, shutdown_grace }
    }

    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig { poll_interval: self.poll_interval, query_timeout: self.accrual_timeout }
    }
}
