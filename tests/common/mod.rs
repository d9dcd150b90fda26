#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use invoice_pay::application::admin::AdminCheck;
use invoice_pay::application::payments::PaymentService;
use invoice_pay::domain::identity::DEFAULT_ROLES_CLAIM;
use invoice_pay::domain::invoice::{Invoice, InvoiceId};
use invoice_pay::domain::payment::Currency;
use invoice_pay::infrastructure::in_memory::{
    InMemoryInvoiceStore, InMemoryPaymentGateway, StaticIdentityProvider,
};
use invoice_pay::interfaces::http::{AppState, build_router};
use serde_json::{Value, json};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const MEMBER_TOKEN: &str = "member-token";

/// A router wired to in-memory collaborators, with handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub gateway: InMemoryPaymentGateway,
    pub store: InMemoryInvoiceStore,
    pub identity: StaticIdentityProvider,
}

pub async fn app() -> TestApp {
    app_with(InMemoryPaymentGateway::new(), StaticIdentityProvider::new()).await
}

pub async fn app_with(
    gateway: InMemoryPaymentGateway,
    identity: StaticIdentityProvider,
) -> TestApp {
    let store = InMemoryInvoiceStore::new();
    store
        .insert(Invoice::new(InvoiceId::parse("inv_1").unwrap()))
        .await;

    identity
        .add_user(ADMIN_TOKEN, json!({ "sub": "auth0|admin", DEFAULT_ROLES_CLAIM: ["admin"] }))
        .await
        .unwrap();
    identity
        .add_user(MEMBER_TOKEN, json!({ "sub": "auth0|member", DEFAULT_ROLES_CLAIM: [] }))
        .await
        .unwrap();

    let state = AppState::new(
        PaymentService::new(
            Box::new(gateway.clone()),
            Box::new(store.clone()),
            Currency::default(),
        ),
        AdminCheck::new(Box::new(identity.clone()), DEFAULT_ROLES_CLAIM),
    );

    TestApp {
        router: build_router(state),
        gateway,
        store,
        identity,
    }
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn get_with_authorization(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
