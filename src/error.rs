use crate::domain::invoice::InvoiceRejection;
use crate::domain::order_code::RegistrationId;
use crate::domain::promo::PromoRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Malformed order code: {0:?}")]
    MalformedOrderCode(String),
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
    #[error("Promo code rejected: {0}")]
    PromoInvalid(PromoRejection),
    #[error("Invoice field invalid: {0}")]
    InvoiceFieldInvalid(InvoiceRejection),
    #[error("Unknown promo code: {0}")]
    UnknownPromoCode(String),
    #[error("Unknown registration: {0}")]
    UnknownRegistration(RegistrationId),
    #[error("Registration {0} is already paid")]
    AlreadyPaid(RegistrationId),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
