use crate::domain::order_code::RegistrationId;
use crate::domain::ports::{PromoCodeStore, RegistrationStore};
use crate::domain::promo::PromoCode;
use crate::domain::registration::Registration;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for promo codes.
///
/// Codes are keyed by their normalized form. `redeem` holds the write lock
/// across the check and the increment, so concurrent settlements can never
/// push `used_count` past `max_uses`.
#[derive(Default, Clone)]
pub struct InMemoryPromoCodeStore {
    codes: Arc<RwLock<HashMap<String, PromoCode>>>,
}

impl InMemoryPromoCodeStore {
    /// Creates a new, empty in-memory promo code store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromoCodeStore for InMemoryPromoCodeStore {
    async fn store(&self, promo: PromoCode) -> Result<()> {
        let mut codes = self.codes.write().await;
        codes.insert(promo.key(), promo);
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<PromoCode>> {
        let codes = self.codes.read().await;
        Ok(codes.get(&PromoCode::normalize(code)).cloned())
    }

    async fn get_all(&self) -> Result<Vec<PromoCode>> {
        let codes = self.codes.read().await;
        Ok(codes.values().cloned().collect())
    }

    async fn redeem(&self, code: &str) -> Result<bool> {
        let mut codes = self.codes.write().await;
        match codes.get_mut(&PromoCode::normalize(code)) {
            Some(promo) if !promo.is_exhausted() => {
                promo.used_count += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// A thread-safe in-memory store for registrations.
///
/// Uses `Arc<RwLock<HashMap<RegistrationId, Registration>>>` for shared concurrent access.
#[derive(Default, Clone)]
pub struct InMemoryRegistrationStore {
    registrations: Arc<RwLock<HashMap<RegistrationId, Registration>>>,
}

impl InMemoryRegistrationStore {
    /// Creates a new, empty in-memory registration store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn store(&self, registration: Registration) -> Result<()> {
        let mut registrations = self.registrations.write().await;
        registrations.insert(registration.id, registration);
        Ok(())
    }

    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        let mut all: Vec<Registration> = registrations.values().cloned().collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use crate::domain::order_code::OrderCode;
    use crate::domain::plan::PlanTag;
    use crate::domain::promo::DiscountType;
    use crate::domain::registration::PaymentStatus;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_promo_store_is_case_insensitive() {
        let store = InMemoryPromoCodeStore::new();
        let promo = PromoCode::new("Early10", DiscountType::Percentage, dec!(10));

        store.store(promo.clone()).await.unwrap();
        let retrieved = store.get(" early10").await.unwrap().unwrap();
        assert_eq!(retrieved, promo);

        assert!(store.get("LATE10").await.unwrap().is_none());
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_promo_store_redeem_respects_max_uses() {
        let store = InMemoryPromoCodeStore::new();
        let mut promo = PromoCode::new("TWICE", DiscountType::Fixed, dec!(100));
        promo.max_uses = Some(2);
        store.store(promo).await.unwrap();

        assert!(store.redeem("twice").await.unwrap());
        assert!(store.redeem("TWICE").await.unwrap());
        assert!(!store.redeem("TWICE").await.unwrap());
        assert_eq!(store.get("TWICE").await.unwrap().unwrap().used_count, 2);

        assert!(!store.redeem("MISSING").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_registration_store() {
        let store = InMemoryRegistrationStore::new();
        let id = RegistrationId::new(1).unwrap();
        let registration = Registration {
            id,
            plan: PlanTag::Single,
            event: None,
            party_size: 1,
            promo_code: None,
            base_amount: Amount::new(dec!(3000)).unwrap(),
            amount_due: Amount::new(dec!(3000)).unwrap(),
            order_code: OrderCode::encode_at(id, 1),
            status: PaymentStatus::Pending,
        };

        store.store(registration.clone()).await.unwrap();
        let retrieved = store.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved, registration);

        assert!(store.get(RegistrationId::new(2).unwrap()).await.unwrap().is_none());
        assert_eq!(store.get_all().await.unwrap(), vec![registration]);
    }
}
