use crate::domain::invoice::{Invoice, InvoiceId};
use crate::domain::ports::InvoiceStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, error};

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_INVOICE_COLLECTION: &str = "invoices";

const SERVICE: &str = "document store";

/// Invoice store backed by the Firestore REST API.
///
/// `createdAt` and `paidAt` are written with a `REQUEST_TIME` transform so the
/// timestamps come from the store, not from this process.
#[derive(Clone)]
pub struct FirestoreInvoiceStore {
    client: Client,
    base_url: String,
    project_id: String,
    collection: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreInvoiceStore {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        collection: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            project_id: project_id.into(),
            collection: collection.into(),
            access_token,
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// Resource name used inside request bodies; never part of a URL.
    fn document_name(&self, id: &InvoiceId) -> String {
        format!("{}/{}/{}", self.database_path(), self.collection, id)
    }

    /// Appends `segments` to the base URL, percent-encoding each one so ids
    /// containing `#`, `?` or `%` address their own document.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| PaymentError::InternalError(Box::new(e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::InternalError("Firestore base URL cannot hold a path".into())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn commit_url(&self) -> Result<Url> {
        self.url(&[
            "v1",
            "projects",
            &self.project_id,
            "databases",
            "(default)",
            "documents:commit",
        ])
    }

    fn document_url(&self, id: &InvoiceId) -> Result<Url> {
        self.url(&[
            "v1",
            "projects",
            &self.project_id,
            "databases",
            "(default)",
            "documents",
            &self.collection,
            id.as_str(),
        ])
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Body of the `documents:commit` call that writes a new invoice.
    fn create_commit(&self, invoice: &Invoice) -> Result<Value> {
        let Value::Object(mut fields) = serde_json::to_value(invoice)? else {
            return Err(PaymentError::InternalError(
                "invoice did not serialize to an object".into(),
            ));
        };
        fields.remove("id");
        fields.remove("createdAt");
        let fields: Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect();

        Ok(json!({
            "writes": [{
                "update": {
                    "name": self.document_name(&invoice.id),
                    "fields": fields
                },
                "updateTransforms": [{
                    "fieldPath": "createdAt",
                    "setToServerValue": "REQUEST_TIME"
                }],
                "currentDocument": { "exists": false }
            }]
        }))
    }

    /// Body of the `documents:commit` call that marks an invoice paid.
    fn mark_paid_commit(&self, id: &InvoiceId, payment_intent_id: &str) -> Value {
        json!({
            "writes": [{
                "update": {
                    "name": self.document_name(id),
                    "fields": {
                        "status": { "stringValue": "paid" },
                        "paymentIntentId": { "stringValue": payment_intent_id }
                    }
                },
                "updateMask": { "fieldPaths": ["status", "paymentIntentId"] },
                "updateTransforms": [{
                    "fieldPath": "paidAt",
                    "setToServerValue": "REQUEST_TIME"
                }],
                "currentDocument": { "exists": true }
            }]
        })
    }

    async fn commit(&self, body: &Value) -> Result<reqwest::Response> {
        let url = self.commit_url()?;
        debug!(%url, "Committing write");

        self.authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::upstream(SERVICE, e.to_string()))
    }
}

/// Converts plain JSON to a Firestore typed value.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Converts a Firestore typed value (`{"stringValue": "x"}`) to plain JSON.
fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "mapValue" => Value::Object(decode_fields(
            inner.get("fields").and_then(Value::as_object),
        )),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "nullValue" => Value::Null,
        _ => inner.clone(),
    }
}

fn decode_fields(fields: Option<&Map<String, Value>>) -> Map<String, Value> {
    fields
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode_value(v)))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl InvoiceStore for FirestoreInvoiceStore {
    async fn create(&self, invoice: Invoice) -> Result<()> {
        let response = self.commit(&self.create_commit(&invoice)?).await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                error!(%status, %body, invoice_id = %invoice.id, "Invoice create rejected");
                Err(PaymentError::upstream(SERVICE, format!("HTTP {status}")))
            }
        }
    }

    async fn mark_paid(&self, id: &InvoiceId, payment_intent_id: &str) -> Result<()> {
        let response = self
            .commit(&self.mark_paid_commit(id, payment_intent_id))
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(PaymentError::NotFound(format!("invoice {id}"))),
            status => {
                let body = response.text().await.unwrap_or_default();
                error!(%status, %body, "Payment status commit rejected");
                Err(PaymentError::upstream(SERVICE, format!("HTTP {status}")))
            }
        }
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>> {
        let response = self
            .authorize(self.client.get(self.document_url(id)?))
            .send()
            .await
            .map_err(|e| PaymentError::upstream(SERVICE, e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document: Document = response.json().await.map_err(|e| {
                    PaymentError::upstream(SERVICE, format!("unreadable document: {e}"))
                })?;
                let mut fields = decode_fields(Some(&document.fields));
                fields.insert("id".to_string(), Value::from(id.as_str()));
                Ok(Some(serde_json::from_value(Value::Object(fields))?))
            }
            status => {
                error!(%status, invoice_id = %id, "Invoice read rejected");
                Err(PaymentError::upstream(SERVICE, format!("HTTP {status}")))
            }
        }
    }
}
