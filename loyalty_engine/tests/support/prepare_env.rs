use chrono::{DateTime, Utc};
use log::*;
use loyalty_engine::{
    db_types::{NewOrder, NewUser, Order, OrderNumber, User},
    AuthManagement,
    InsertOrderResult,
    OrderManagement,
    SqliteDatabase,
};
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("🚀️ Nothing to drop at {url}: {e}");
    }
}

pub fn random_db_path() -> String {
    format!("sqlite://{}/lpg_test_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

/// A fresh, migrated database in the temp dir.
pub async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    db.migrate().await.expect("Error running DB migrations");
    db
}

pub async fn tear_down(db: SqliteDatabase) {
    db.close().await;
    if let Err(e) = Sqlite::drop_database(db.url()).await {
        warn!("🚀️ Could not drop {}: {e}", db.url());
    }
}

/// Appends the Luhn check digit to `seed`.
pub fn order_number(seed: u64) -> OrderNumber {
    let base = seed.to_string();
    let sum: u32 = base
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap();
            match (i % 2 == 0, d * 2) {
                (true, dd) if dd > 9 => dd - 9,
                (true, dd) => dd,
                (false, _) => d,
            }
        })
        .sum();
    format!("{base}{}", (10 - sum % 10) % 10).parse().unwrap()
}

pub async fn new_user(db: &SqliteDatabase, login: &str) -> User {
    db.create_user(NewUser { login: login.into(), password_hash: "v1$1$c2FsdA$aGFzaA".into() }).await.unwrap()
}

pub async fn new_order(db: &SqliteDatabase, user_id: i64, number: &OrderNumber, uploaded_at: DateTime<Utc>) -> Order {
    let order = NewOrder { number: number.clone(), user_id, uploaded_at };
    match db.insert_order(order).await.unwrap() {
        InsertOrderResult::Inserted(o) => o,
        InsertOrderResult::AlreadyExists(o) => panic!("Order {} already exists", o.number),
    }
}
