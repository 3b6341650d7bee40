//! # Loyalty engine public API
//!
//! The `lpe_api` module exposes the programmatic API used by the server.
//!
//! * [`order_flow_api`] handles order uploads and order listings.
//! * [`accounts_api`] provides balances, withdrawals and withdrawal histories.
//! * [`auth_api`] manages user records.
//!
//! Every call takes the authenticated user's id explicitly. Nothing in this module knows how that user was
//! authenticated.
//!
//! # API usage
//!
//! An API instance is created by supplying a ledger backend that implements the backend traits the API needs:
//!
//! ```rust,ignore
//! use loyalty_engine::{OrderFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/loyalty.db", 5).await?;
//! // SqliteDatabase implements OrderManagement
//! let api = OrderFlowApi::new(db);
//! let outcome = api.upload_order(user_id, "79927398713").await?;
//! ```
pub mod accounts_api;
pub mod auth_api;
pub mod errors;
pub mod order_flow_api;
