use actix_web::{
    http::{header::SET_COOKIE, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use chrono::Utc;
use loyalty_engine::{db_types::User, AuthApi, LedgerError};
use serde_json::json;

use super::helpers::{send, token_issuer, user};
use crate::{
    auth::{hash_password, verify_password},
    endpoint_tests::mocks::MockAuthManager,
    routes::{LoginRoute, RegisterRoute},
};

#[actix_web::test]
async fn register_new_user() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/user/register").set_json(json!({"login": "bob", "password": "hunter2"}));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.json()["token"].as_str().unwrap().to_string();
    let claims = token_issuer().validate_token(&token).unwrap();
    assert_eq!(claims.uid, 2);
    assert_eq!(claims.login, "bob");
    assert_eq!(res.headers.get("Authorization").unwrap().to_str().unwrap(), format!("Bearer {token}"));
    let cookie = res.headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with(&format!("jwt={token}")));
    assert!(cookie.contains("HttpOnly"));
}

#[actix_web::test]
async fn register_taken_login() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/user/register").set_json(json!({"login": "alice", "password": "pw"}));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json()["error"], "The login 'alice' is already taken");
}

#[actix_web::test]
async fn register_with_missing_credentials() {
    let _ = env_logger::try_init().ok();
    for body in [json!({"login": "bob", "password": ""}), json!({"login": "  ", "password": "pw"}), json!({"login": "bob"})]
    {
        let req = TestRequest::post().uri("/api/user/register").set_json(body.clone());
        let res = send(req, configure).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[actix_web::test]
async fn login() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/user/login").set_json(json!({"login": "alice", "password": "s3cret!"}));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.json()["token"].as_str().unwrap().to_string();
    assert_eq!(token_issuer().validate_token(&token).unwrap().uid, 1);
    assert!(res.headers.get(SET_COOKIE).is_some());
}

#[actix_web::test]
async fn login_failures_look_the_same() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/user/login").set_json(json!({"login": "alice", "password": "wrong"}));
    let wrong_password = send(req, configure).await;
    let req = TestRequest::post().uri("/api/user/login").set_json(json!({"login": "mallory", "password": "s3cret!"}));
    let unknown_user = send(req, configure).await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert!(wrong_password.headers.get(SET_COOKIE).is_none());
}

fn configure(cfg: &mut ServiceConfig) {
    let alice = User { password_hash: hash_password("s3cret!").unwrap(), ..user(1, "alice") };
    let mut auth_manager = MockAuthManager::new();
    auth_manager.expect_create_user().returning(|new_user| {
        if new_user.login == "alice" {
            return Err(LedgerError::LoginTaken(new_user.login));
        }
        assert!(verify_password("hunter2", &new_user.password_hash));
        Ok(User { id: 2, login: new_user.login, password_hash: new_user.password_hash, created_at: Utc::now() })
    });
    auth_manager
        .expect_fetch_user_by_login()
        .returning(move |login| Ok((login == "alice").then(|| alice.clone())));
    let auth_api = AuthApi::new(auth_manager);
    cfg.service(RegisterRoute::<MockAuthManager>::new())
        .service(LoginRoute::<MockAuthManager>::new())
        .app_data(web::Data::new(auth_api));
}
