use super::order_code::RegistrationId;
use super::promo::PromoCode;
use super::registration::Registration;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PromoCodeStore: Send + Sync {
    /// Inserts or replaces a code, keyed by [`PromoCode::key`].
    async fn store(&self, promo: PromoCode) -> Result<()>;
    /// Looks a code up case-insensitively.
    async fn get(&self, code: &str) -> Result<Option<PromoCode>>;
    async fn get_all(&self) -> Result<Vec<PromoCode>>;
    /// Records one use of `code` if it is still below `max_uses`.
    ///
    /// The check and the increment happen atomically. Returns `false` when
    /// the code is unknown or already exhausted.
    async fn redeem(&self, code: &str) -> Result<bool>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn store(&self, registration: Registration) -> Result<()>;
    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>>;
    async fn get_all(&self) -> Result<Vec<Registration>>;
}

pub type PromoCodeStoreBox = Box<dyn PromoCodeStore>;
pub type RegistrationStoreBox = Box<dyn RegistrationStore>;
