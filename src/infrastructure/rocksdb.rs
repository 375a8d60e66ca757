use crate::domain::order_code::RegistrationId;
use crate::domain::ports::{PromoCodeStore, RegistrationStore};
use crate::domain::promo::PromoCode;
use crate::domain::registration::Registration;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing promo codes, keyed by normalized code.
pub const CF_PROMO_CODES: &str = "promo_codes";
/// Column Family for storing registrations, keyed by big-endian id.
pub const CF_REGISTRATIONS: &str = "registrations";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `PromoCode` and `Registration` entities using
/// separate Column Families. Values are JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    /// Serializes the read-modify-write in `redeem`.
    redeem_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_promos = ColumnFamilyDescriptor::new(CF_PROMO_CODES, Options::default());
        let cf_registrations = ColumnFamilyDescriptor::new(CF_REGISTRATIONS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_promos, cf_registrations])?;

        Ok(Self {
            db: Arc::new(db),
            redeem_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            CheckoutError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put_json<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value).map_err(|e| {
            CheckoutError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(decode_json(&bytes)?)),
            None => Ok(None),
        }
    }

    fn all_json<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(decode_json(&value)?);
        }
        Ok(values)
    }
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        CheckoutError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl PromoCodeStore for RocksDBStore {
    async fn store(&self, promo: PromoCode) -> Result<()> {
        self.put_json(CF_PROMO_CODES, promo.key().as_bytes(), &promo)
    }

    async fn get(&self, code: &str) -> Result<Option<PromoCode>> {
        self.get_json(CF_PROMO_CODES, PromoCode::normalize(code).as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<PromoCode>> {
        self.all_json(CF_PROMO_CODES)
    }

    async fn redeem(&self, code: &str) -> Result<bool> {
        let _guard = self.redeem_lock.lock().await;
        let key = PromoCode::normalize(code);
        let Some(mut promo) = self.get_json::<PromoCode>(CF_PROMO_CODES, key.as_bytes())? else {
            return Ok(false);
        };
        if promo.is_exhausted() {
            return Ok(false);
        }
        promo.used_count += 1;
        self.put_json(CF_PROMO_CODES, key.as_bytes(), &promo)?;
        Ok(true)
    }
}

#[async_trait]
impl RegistrationStore for RocksDBStore {
    async fn store(&self, registration: Registration) -> Result<()> {
        let key = registration.id.value().to_be_bytes();
        self.put_json(CF_REGISTRATIONS, &key, &registration)
    }

    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>> {
        self.get_json(CF_REGISTRATIONS, &id.value().to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Registration>> {
        // Big-endian keys iterate in id order
        self.all_json(CF_REGISTRATIONS)
    }
}
