//! # Loyalty points gateway server
//! This crate hosts the HTTP server for the loyalty points gateway. It is responsible for:
//! * Registering and authenticating users.
//! * Accepting order uploads, and reporting on orders, balances and withdrawals.
//! * Running the reconciliation worker, which settles uploaded orders against the accrual system in the background.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/user/register` and `POST /api/user/login`: issue access tokens.
//! * `POST /api/user/orders` and `GET /api/user/orders`: upload an order number, and list your orders.
//! * `GET /api/user/balance` and `POST /api/user/balance/withdraw`: your balance, and spending it.
//! * `GET /api/user/withdrawals`: your withdrawal history.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod reconciliation_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
