use super::router::AppState;
use crate::domain::invoice::{Invoice, InvoiceId};
use crate::domain::payment::Amount;
use crate::error::{PaymentError, Result};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub amount: i64,
    pub invoice_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub property_id: String,
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
    pub total_price: i64,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    pub invoice_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    pub invoice_id: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatePaymentStatusResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminResponse {
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    pub id: Option<String>,
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| PaymentError::ValidationError(rejection.body_text()))
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let (scheme, token) = headers.get(AUTHORIZATION)?.to_str().ok()?.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty()).then_some(token)
}

pub async fn create_invoice(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateInvoiceResponse>)> {
    let request = body(payload)?;
    let total_price = Amount::new(request.total_price)?;

    let mut details = Map::new();
    for (key, value) in [
        ("propertyId", request.property_id),
        ("userId", request.user_id),
        ("startDate", request.start_date),
        ("endDate", request.end_date),
    ] {
        if value.trim().is_empty() {
            return Err(PaymentError::ValidationError(format!("{key} is required")));
        }
        details.insert(key.to_string(), Value::String(value));
    }
    if let Some(description) = request.description {
        details.insert("description".to_string(), Value::String(description));
    }

    let invoice_id = state.payments.create_invoice(total_price, details).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateInvoiceResponse {
            invoice_id: invoice_id.to_string(),
        }),
    ))
}

pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>> {
    let request = body(payload)?;
    let amount = Amount::new(request.amount)?;
    let invoice_id = InvoiceId::parse(request.invoice_id)?;

    let client_secret = state.payments.create_payment_intent(amount, invoice_id).await?;
    Ok(Json(CreatePaymentIntentResponse { client_secret }))
}

/// Marks an invoice paid on the caller's say-so. Nothing here confirms the
/// intent with the gateway, so this route must not be exposed beyond the
/// payment-completion page without further authorization.
pub async fn update_payment_status(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdatePaymentStatusRequest>, JsonRejection>,
) -> Result<Json<UpdatePaymentStatusResponse>> {
    let request = body(payload)?;
    let invoice_id = InvoiceId::parse(request.invoice_id)?;

    state
        .payments
        .update_payment_status(&invoice_id, &request.payment_intent_id)
        .await?;
    Ok(Json(UpdatePaymentStatusResponse { success: true }))
}

pub async fn check_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckAdminResponse>> {
    let is_admin = state.admin.is_admin(bearer_token(&headers)).await?;
    Ok(Json(CheckAdminResponse { is_admin }))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    query: std::result::Result<Query<InvoiceQuery>, QueryRejection>,
) -> Result<Json<Invoice>> {
    let Query(query) = query.map_err(|r| PaymentError::ValidationError(r.body_text()))?;
    let id = query
        .id
        .ok_or_else(|| PaymentError::ValidationError("Invoice id is required".to_string()))?;
    let invoice_id = InvoiceId::parse(id)?;

    Ok(Json(state.payments.get_invoice(&invoice_id).await?))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
