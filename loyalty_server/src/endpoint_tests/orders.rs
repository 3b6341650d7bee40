use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{DateTime, TimeZone, Utc};
use loyalty_engine::{
    db_types::{Order, OrderStatusType},
    InsertOrderResult,
    OrderFlowApi,
};
use lpg_common::Points;

use super::helpers::{bearer, expired_token, issue_token, send};
use crate::{
    endpoint_tests::mocks::MockOrderManager,
    routes::{MyOrdersRoute, UploadOrderRoute},
};

const NEW_ORDER: &str = "79927398713";
const MY_OLD_ORDER: &str = "12345678903";
const SOMEONE_ELSES_ORDER: &str = "2377225624";

#[actix_web::test]
async fn upload_without_a_token() {
    let _ = env_logger::try_init().ok();
    let res = send(TestRequest::post().uri("/api/user/orders").set_payload(NEW_ORDER), configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.json()["error"].as_str().unwrap().contains("No access token was provided"));
}

#[actix_web::test]
async fn upload_new_order() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/api/user/orders").insert_header(bearer(&issue_token(1))).set_payload(NEW_ORDER);
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::ACCEPTED);
    let json = res.json();
    assert_eq!(json["number"], NEW_ORDER);
    assert_eq!(json["status"], "NEW");
    assert!(json.get("accrual").is_none());
}

#[actix_web::test]
async fn upload_order_again() {
    let _ = env_logger::try_init().ok();
    let req =
        TestRequest::post().uri("/api/user/orders").insert_header(bearer(&issue_token(1))).set_payload(MY_OLD_ORDER);
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["status"], "PROCESSED");
}

#[actix_web::test]
async fn upload_someone_elses_order() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(bearer(&issue_token(1)))
        .set_payload(SOMEONE_ELSES_ORDER);
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json()["error"], "Order #2377225624 has already been uploaded by another user");
}

#[actix_web::test]
async fn upload_bad_order_numbers() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1);
    let req = TestRequest::post().uri("/api/user/orders").insert_header(bearer(&token)).set_payload("79927398710");
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json()["error"], "Invalid order number: '79927398710'");

    let req = TestRequest::post().uri("/api/user/orders").insert_header(bearer(&token)).set_payload("  \n");
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/orders").insert_header(bearer(&issue_token(1)));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, ORDERS_JSON);
}

#[actix_web::test]
async fn fetch_my_orders_with_a_cookie() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/orders").insert_header(("Cookie", format!("jwt={}", issue_token(1))));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, ORDERS_JSON);
}

#[actix_web::test]
async fn fetch_my_orders_compressed() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get()
        .uri("/api/user/orders")
        .insert_header(bearer(&issue_token(1)))
        .insert_header(("Accept-Encoding", "gzip"));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers.get("Content-Encoding").unwrap(), "gzip");
    assert_ne!(res.body, ORDERS_JSON);
}

#[actix_web::test]
async fn fetch_orders_when_there_are_none() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/orders").insert_header(bearer(&issue_token(2)));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());
}

#[actix_web::test]
async fn fetch_my_orders_invalid_sig() {
    let _ = env_logger::try_init().ok();
    let mut token = issue_token(1);
    token.replace_range(token.len() - 10..token.len() - 5, "AAAAA");
    let req = TestRequest::get().uri("/api/user/orders").insert_header(bearer(&token));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["error"], "Authentication Error. Access token signature is invalid.");
}

#[actix_web::test]
async fn fetch_my_orders_expired_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/orders").insert_header(bearer(&expired_token(1)));
    let res = send(req, configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.json()["error"].as_str().unwrap().contains("expired"));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut order_manager = MockOrderManager::new();
    order_manager.expect_insert_order().returning(|order| match order.number.as_str() {
        MY_OLD_ORDER => Ok(InsertOrderResult::AlreadyExists(orders_response().remove(1))),
        SOMEONE_ELSES_ORDER => Ok(InsertOrderResult::AlreadyExists(Order {
            user_id: 2,
            ..new_order(SOMEONE_ELSES_ORDER, order.uploaded_at)
        })),
        number => {
            Ok(InsertOrderResult::Inserted(Order { user_id: order.user_id, ..new_order(number, order.uploaded_at) }))
        },
    });
    order_manager
        .expect_fetch_orders_for_user()
        .returning(|user_id| if user_id == 1 { Ok(orders_response()) } else { Ok(vec![]) });
    let orders_api = OrderFlowApi::new(order_manager);
    cfg.service(UploadOrderRoute::<MockOrderManager>::new())
        .service(MyOrdersRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(orders_api));
}

fn new_order(number: &str, uploaded_at: DateTime<Utc>) -> Order {
    Order {
        number: number.parse().unwrap(),
        user_id: 1,
        status: OrderStatusType::New,
        accrual: None,
        uploaded_at,
        updated_at: uploaded_at,
    }
}

// Mock response to `fetch_orders_for_user`, newest first
fn orders_response() -> Vec<Order> {
    vec![
        Order {
            status: OrderStatusType::Processing,
            ..new_order("2377225624", Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap())
        },
        Order {
            status: OrderStatusType::Processed,
            accrual: Some(Points::from(72_998)),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 0).unwrap(),
            ..new_order(MY_OLD_ORDER, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        },
    ]
}

const ORDERS_JSON: &str = r#"[{"number":"2377225624","status":"PROCESSING","uploaded_at":"2024-03-15T18:30:00Z"},{"number":"12345678903","status":"PROCESSED","accrual":729.98,"uploaded_at":"2024-03-01T10:00:00Z"}]"#;
