use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use loyalty_engine::{
    db_types::{Balance, Withdrawal},
    AccountApi,
    LedgerError,
};
use lpg_common::Points;
use serde_json::json;

use super::helpers::{bearer, issue_token, send};
use crate::{
    endpoint_tests::mocks::MockAccountManager,
    routes::{MyBalanceRoute, MyWithdrawalsRoute, WithdrawRoute},
};

const AVAILABLE: i64 = 50_050;
const USED_ORDER: &str = "2377225624";

#[actix_web::test]
async fn fetch_my_balance() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/balance").insert_header(bearer(&issue_token(1)));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"current": 500.5, "withdrawn": 42.0}));
}

#[actix_web::test]
async fn fetch_balance_without_a_token() {
    let _ = env_logger::try_init().ok();
    let res = send(TestRequest::get().uri("/api/user/balance"), configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn withdraw_points() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .insert_header(bearer(&issue_token(1)))
        .set_json(json!({"order": "79927398713", "sum": 500.5}));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["order"], "79927398713");
    assert_eq!(body["sum"], 500.5);
}

#[actix_web::test]
async fn withdraw_more_than_the_balance() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .insert_header(bearer(&issue_token(1)))
        .set_json(json!({"order": "79927398713", "sum": 500.51}));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(res.json()["error"], "Insufficient funds. Requested 500.51, but only 500.50 is available");
}

#[actix_web::test]
async fn withdraw_against_a_used_order_number() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .insert_header(bearer(&issue_token(1)))
        .set_json(json!({"order": USED_ORDER, "sum": 1}));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn invalid_withdrawals() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1);
    for body in [json!({"order": "79927398710", "sum": 10}), json!({"order": "79927398713", "sum": 0})] {
        let req =
            TestRequest::post().uri("/api/user/balance/withdraw").insert_header(bearer(&token)).set_json(body.clone());
        let res = send(req, configure).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }
    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"order": "79927398713"}"#);
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn fetch_my_withdrawals() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/withdrawals").insert_header(bearer(&issue_token(1)));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json(),
        json!([
            {"order": "79927398713", "sum": 42.0, "processed_at": "2024-03-20T08:15:00Z"},
            {"order": "12345678903", "sum": 0.25, "processed_at": "2024-03-02T16:00:00Z"},
        ])
    );

    let req = TestRequest::get().uri("/api/user/withdrawals").insert_header(bearer(&issue_token(2)));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
}

fn configure(cfg: &mut ServiceConfig) {
    let mut account_manager = MockAccountManager::new();
    account_manager.expect_fetch_balance().returning(|user_id| {
        Ok((user_id == 1).then(|| Balance { current: Points::from(AVAILABLE), withdrawn: Points::from_whole(42) }))
    });
    account_manager.expect_withdraw().returning(|user_id, withdrawal| {
        if withdrawal.order_number.as_str() == USED_ORDER {
            return Err(LedgerError::DuplicateWithdrawal(withdrawal.order_number));
        }
        if withdrawal.sum > Points::from(AVAILABLE) {
            return Err(LedgerError::InsufficientFunds {
                requested: withdrawal.sum,
                available: Points::from(AVAILABLE),
            });
        }
        Ok(Withdrawal {
            order_number: withdrawal.order_number,
            user_id,
            sum: withdrawal.sum,
            processed_at: Utc::now(),
        })
    });
    account_manager.expect_fetch_withdrawals_for_user().returning(|user_id| {
        if user_id != 1 {
            return Ok(vec![]);
        }
        Ok(vec![
            Withdrawal {
                order_number: "79927398713".parse().unwrap(),
                user_id,
                sum: Points::from_whole(42),
                processed_at: Utc.with_ymd_and_hms(2024, 3, 20, 8, 15, 0).unwrap(),
            },
            Withdrawal {
                order_number: "12345678903".parse().unwrap(),
                user_id,
                sum: Points::from(25),
                processed_at: Utc.with_ymd_and_hms(2024, 3, 2, 16, 0, 0).unwrap(),
            },
        ])
    });
    let accounts_api = AccountApi::new(account_manager);
    cfg.service(MyBalanceRoute::<MockAccountManager>::new())
        .service(WithdrawRoute::<MockAccountManager>::new())
        .service(MyWithdrawalsRoute::<MockAccountManager>::new())
        .app_data(web::Data::new(accounts_api));
}
