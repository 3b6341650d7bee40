use std::time::Duration;

use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    http::KeepAlive,
    middleware::{Compress, Logger},
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use loyalty_engine::{AccountApi, AuthApi, OrderFlowApi, SqliteDatabase};

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    reconciliation_worker::start_reconciliation_worker,
    routes::{
        health,
        LoginRoute,
        MyBalanceRoute,
        MyOrdersRoute,
        MyWithdrawalsRoute,
        RegisterRoute,
        UploadOrderRoute,
        WithdrawRoute,
    },
};

/// Opens and migrates the ledger, starts the reconciliation worker and serves requests until the process receives a
/// shutdown signal. The worker is then given `shutdown_grace` to finish up.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not migrate the ledger. {e}")))?;
    info!("🗃️ Ledger is ready at {}", db.url());
    let worker = match &config.reconciliation.accrual_system_address {
        Some(address) => Some(start_reconciliation_worker(db.clone(), address, &config.reconciliation)?),
        None => {
            error!(
                "🚀️ No accrual system address has been configured. Orders will be accepted, but not reconciled. Set \
                 LPG_ACCRUAL_SYSTEM_ADDRESS to fix this."
            );
            None
        },
    };
    let grace = config.reconciliation.shutdown_grace;
    let srv = create_server_instance(config, db.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    info!("🚀️ Server has stopped");
    if let Some(worker) = worker {
        worker.stop(grace).await;
    }
    db.close().await;
    result
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let signer = TokenIssuer::new(&config.auth);
        let user_scope = web::scope("/api/user")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(UploadOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(MyBalanceRoute::<SqliteDatabase>::new())
            .service(WithdrawRoute::<SqliteDatabase>::new())
            .service(MyWithdrawalsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Compress::default())
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lpg::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(signer))
            .service(health)
            .service(user_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported as `400 Bad Request`, in the same `{"error": ...}` format as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejected request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
