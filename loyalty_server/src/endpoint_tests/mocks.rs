use loyalty_engine::{
    db_types::{Balance, NewOrder, NewUser, NewWithdrawal, Order, OrderNumber, User, Withdrawal},
    AccountManagement,
    AuthManagement,
    InsertOrderResult,
    LedgerError,
    OrderManagement,
};
use lpg_common::Points;
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LedgerError>;
        async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, LedgerError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LedgerError>;
    }
}

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn fetch_balance(&self, user_id: i64) -> Result<Option<Balance>, LedgerError>;
        async fn credit_balance(&self, user_id: i64, amount: Points) -> Result<Balance, LedgerError>;
        async fn withdraw(&self, user_id: i64, withdrawal: NewWithdrawal) -> Result<Withdrawal, LedgerError>;
        async fn fetch_withdrawals_for_user(&self, user_id: i64) -> Result<Vec<Withdrawal>, LedgerError>;
    }
}

mock! {
    pub AuthManager {}
    impl AuthManagement for AuthManager {
        async fn create_user(&self, user: NewUser) -> Result<User, LedgerError>;
        async fn fetch_user_by_login(&self, login: &str) -> Result<Option<User>, LedgerError>;
    }
}
