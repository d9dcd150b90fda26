use crate::domain::invoice::{Invoice, InvoiceId};
use crate::domain::ports::InvoiceStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing invoice documents.
pub const CF_INVOICES: &str = "invoices";

/// A persistent invoice store using RocksDB.
///
/// Invoices live in their own column family, keyed by invoice id and encoded
/// as JSON documents.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "invoices" column family exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_invoices = ColumnFamilyDescriptor::new(CF_INVOICES, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_invoices])?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Writes a whole invoice document, replacing any previous one.
    pub fn insert(&self, invoice: &Invoice) -> Result<()> {
        let cf = self.invoices_cf()?;
        let value = serde_json::to_vec(invoice)?;
        self.db.put_cf(cf, invoice.id.as_str().as_bytes(), value)?;
        Ok(())
    }

    fn invoices_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_INVOICES).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(
                "Invoices column family not found",
            )))
        })
    }

    fn read(&self, id: &InvoiceId) -> Result<Option<Invoice>> {
        let cf = self.invoices_cf()?;
        match self.db.get_cf(cf, id.as_str().as_bytes())? {
            Some(bytes) => {
                let invoice = serde_json::from_slice(&bytes).map_err(|e| {
                    PaymentError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Deserialization error: {}", e),
                    )))
                })?;
                Ok(Some(invoice))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl InvoiceStore for RocksDBStore {
    async fn create(&self, mut invoice: Invoice) -> Result<()> {
        if self.read(&invoice.id)?.is_some() {
            return Err(PaymentError::InternalError(
                format!("invoice {} already exists", invoice.id).into(),
            ));
        }
        invoice.created_at = Some(Utc::now());
        self.insert(&invoice)
    }

    async fn mark_paid(&self, id: &InvoiceId, payment_intent_id: &str) -> Result<()> {
        let mut invoice = self
            .read(id)?
            .ok_or_else(|| PaymentError::NotFound(format!("invoice {id}")))?;
        invoice.mark_paid(payment_intent_id, Utc::now());
        self.insert(&invoice)
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>> {
        self.read(id)
    }
}
