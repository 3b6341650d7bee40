use std::time::Duration;

use actix_web::{
    http::{header::HeaderMap, StatusCode},
    middleware::Compress,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{TimeZone, Utc};
use loyalty_engine::db_types::User;

use crate::{
    auth::{AccessClaims, TokenIssuer},
    config::AuthConfig,
    server::json_config,
};

// DO NOT re-use this secret anywhere.
const TEST_TOKEN_SECRET: &str = "endpoint-tests-only-not-a-real-secret";

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(&AuthConfig::new(TEST_TOKEN_SECRET, Duration::from_secs(3600)))
}

pub fn user(id: i64, login: &str) -> User {
    User {
        id,
        login: login.to_string(),
        password_hash: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

pub fn issue_token(user_id: i64) -> String {
    token_issuer().issue_token(&user(user_id, "alice")).expect("Failed to sign token")
}

pub fn expired_token(user_id: i64) -> String {
    let claims = AccessClaims { uid: user_id, login: "alice".into(), exp: Utc::now().timestamp() - 60 };
    token_issuer().sign(&claims).expect("Failed to sign token")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

/// Runs `req` through an app set up the way the server sets it up, with the routes and mocks added by `configure`.
pub async fn send(req: TestRequest, configure: fn(&mut ServiceConfig)) -> TestResponse {
    let app = App::new()
        .wrap(Compress::default())
        .app_data(json_config())
        .app_data(web::Data::new(token_issuer()))
        .service(web::scope("/api/user").configure(configure));
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    TestResponse { status, headers, body }
}
