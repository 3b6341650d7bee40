//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Password hashing is the only CPU-heavy work here, and is kept to a
//! few milliseconds. Everything else (database access in particular) is async.
//!
//! Every route under `/api/user`, other than `register` and `login`, requires an access token. Taking an
//! [`AuthenticatedUser`] argument is what makes a handler require one.
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    get,
    http::header::AUTHORIZATION,
    web,
    HttpResponse,
    Responder,
};
use log::*;
use loyalty_engine::{
    db_types::User,
    AccountApi,
    AccountManagement,
    AuthApi,
    AuthManagement,
    OrderFlowApi,
    OrderManagement,
    UploadOutcome,
};

use crate::{
    auth::{hash_password, verify_password, AuthenticatedUser, TokenIssuer, ACCESS_TOKEN_COOKIE},
    data_objects::{Credentials, OrderResponse, TokenResponse, WithdrawRequest, WithdrawalResponse},
    errors::{AuthError, ServerError},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/register" impl AuthManagement);
/// Route handler for the registration endpoint
///
/// Creates a new user with a zero balance, and logs them straight in. The access token is returned in the body, in the
/// `Authorization` header, and as the `jwt` cookie.
pub async fn register<A: AuthManagement>(
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let Credentials { login, password } = body.into_inner();
    debug!("💻️ POST register for '{login}'");
    if password.is_empty() {
        return Err(ServerError::InvalidRequestBody("A password is required".into()));
    }
    let hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| ServerError::BackendError(e.to_string()))?
        .map_err(|e| ServerError::BackendError(e.to_string()))?;
    let user = api.register(&login, hash).await?;
    token_response(&user, &signer)
}

route!(login => Post "/login" impl AuthManagement);
/// Route handler for the login endpoint
///
/// An unknown login and a wrong password produce the same response.
pub async fn login<A: AuthManagement>(
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let Credentials { login, password } = body.into_inner();
    debug!("💻️ POST login for '{login}'");
    if login.trim().is_empty() || password.is_empty() {
        return Err(ServerError::InvalidRequestBody("Login and password are required".into()));
    }
    let user = match api.user_by_login(&login).await? {
        Some(user) => {
            let hash = user.password_hash.clone();
            let verified = web::block(move || verify_password(&password, &hash))
                .await
                .map_err(|e| ServerError::BackendError(e.to_string()))?;
            verified.then_some(user)
        },
        None => None,
    };
    let user = user.ok_or_else(|| {
        debug!("💻️ Failed login attempt for '{login}'");
        AuthError::InvalidCredentials
    })?;
    token_response(&user, &signer)
}

fn token_response(user: &User, signer: &TokenIssuer) -> Result<HttpResponse, ServerError> {
    let token = signer.issue_token(user)?;
    trace!("💻️ Issued access token for user #{}", user.id);
    let max_age = CookieDuration::seconds(i64::try_from(signer.expiry().as_secs()).unwrap_or(i64::MAX));
    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, token.clone()).path("/").http_only(true).max_age(max_age).finish();
    Ok(HttpResponse::Ok()
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .cookie(cookie)
        .json(TokenResponse { token }))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(upload_order => Post "/orders" impl OrderManagement);
/// Route handler for order uploads
///
/// The body is the order number as plain text. A new order is accepted with `202 Accepted` and will be picked up by
/// the reconciliation worker. Uploading the same number again returns `200 OK` and changes nothing.
pub async fn upload_order<B: OrderManagement>(
    user: AuthenticatedUser,
    body: String,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST order '{}' for user #{}", body.trim(), user.id);
    let response = match api.upload_order(user.id, &body).await? {
        UploadOutcome::Accepted(order) => HttpResponse::Accepted().json(OrderResponse::from(order)),
        UploadOutcome::AlreadyUploadedBySameUser(order) => HttpResponse::Ok().json(OrderResponse::from(order)),
    };
    Ok(response)
}

route!(my_orders => Get "/orders" impl OrderManagement);
/// Route handler for the orders endpoint
///
/// Returns the user's orders, newest first, or `204 No Content` if they have none.
pub async fn my_orders<B: OrderManagement>(
    user: AuthenticatedUser,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for user #{}", user.id);
    let orders = api.orders_for_user(user.id).await?;
    if orders.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let orders = orders.into_iter().map(OrderResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Balance  ----------------------------------------------------
route!(my_balance => Get "/balance" impl AccountManagement);
pub async fn my_balance<B: AccountManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_balance for user #{}", user.id);
    let balance = api.balance(user.id).await?;
    Ok(HttpResponse::Ok().json(balance))
}

//----------------------------------------------   Withdrawals  ----------------------------------------------------
route!(withdraw => Post "/balance/withdraw" impl AccountManagement);
/// Route handler for withdrawals
///
/// Spends `sum` points against the order number `order`. Fails with `402 Payment Required` if the balance is too low.
pub async fn withdraw<B: AccountManagement>(
    user: AuthenticatedUser,
    body: web::Json<WithdrawRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let WithdrawRequest { order, sum } = body.into_inner();
    debug!("💻️ POST withdraw {sum} against '{order}' for user #{}", user.id);
    let withdrawal = api.withdraw(user.id, &order, sum).await?;
    Ok(HttpResponse::Ok().json(WithdrawalResponse::from(withdrawal)))
}

route!(my_withdrawals => Get "/withdrawals" impl AccountManagement);
pub async fn my_withdrawals<B: AccountManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_withdrawals for user #{}", user.id);
    let withdrawals = api.withdrawals_for_user(user.id).await?;
    if withdrawals.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let withdrawals = withdrawals.into_iter().map(WithdrawalResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(withdrawals))
}
