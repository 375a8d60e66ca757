use crate::domain::invoice::validate_invoice_request;
use crate::domain::money::Amount;
use crate::domain::order_code::{self, OrderCode, RegistrationId};
use crate::domain::plan::{PlanCatalog, PlanTag};
use crate::domain::ports::{PromoCodeStoreBox, RegistrationStoreBox};
use crate::domain::promo::{PromoCode, apply_promo_code};
use crate::domain::registration::{CheckoutRequest, PaymentStatus, Registration};
use crate::error::{CheckoutError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Price breakdown and order code handed to the payment gateway.
///
/// A quote written out by one run can be read back by a later one through
/// [`CheckoutEngine::reopen_quote`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub registration: RegistrationId,
    pub plan: PlanTag,
    pub party_size: u8,
    pub base_amount: Amount,
    pub discount: Amount,
    pub final_amount: Amount,
    pub order_code: OrderCode,
    pub promo_code: Option<String>,
}

/// Runs checkouts against a price list and the promo/registration stores.
///
/// Quoting is side-effect free with respect to promo usage: a code is only
/// redeemed once [`CheckoutEngine::confirm_payment`] sees the gateway callback.
pub struct CheckoutEngine {
    catalog: PlanCatalog,
    promo_store: PromoCodeStoreBox,
    registration_store: RegistrationStoreBox,
}

impl CheckoutEngine {
    /// Creates a new `CheckoutEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Plan prices and party sizes.
    /// * `promo_store` - The store for promo codes and their usage counters.
    /// * `registration_store` - The store for quoted and paid registrations.
    pub fn new(
        catalog: PlanCatalog,
        promo_store: PromoCodeStoreBox,
        registration_store: RegistrationStoreBox,
    ) -> Self {
        Self {
            catalog,
            promo_store,
            registration_store,
        }
    }

    pub fn promo_store(&self) -> &PromoCodeStoreBox {
        &self.promo_store
    }

    /// Prices a checkout request and records the registration as pending.
    ///
    /// `now` drives both the promo validity window and the order-code suffix.
    pub async fn quote(&self, request: CheckoutRequest, now: DateTime<Utc>) -> Result<Quote> {
        validate_invoice_request(&request.invoice())?;

        let plan = request.plan_tag()?;
        let (base_amount, party_size) = self.catalog.compute_base_amount(plan)?;

        let promo = match request.promo_code() {
            Some(code) => Some(
                self.promo_store
                    .get(code)
                    .await?
                    .ok_or_else(|| CheckoutError::UnknownPromoCode(code.to_string()))?,
            ),
            None => None,
        };
        let final_amount = apply_promo_code(base_amount, promo.as_ref(), request.event, now)?;

        let id = request.registration;
        if let Some(existing) = self.registration_store.get(id).await?
            && existing.is_paid()
        {
            return Err(CheckoutError::AlreadyPaid(id));
        }

        let order_code = OrderCode::encode_at(id, now.timestamp_millis());
        let registration = Registration {
            id,
            plan,
            event: request.event,
            party_size,
            promo_code: promo.as_ref().map(PromoCode::key),
            base_amount,
            amount_due: final_amount,
            order_code: order_code.clone(),
            status: PaymentStatus::Pending,
        };
        let quote = Quote {
            registration: id,
            plan,
            party_size,
            base_amount,
            discount: registration.discount(),
            final_amount,
            order_code,
            promo_code: registration.promo_code.clone(),
        };
        self.registration_store.store(registration).await?;

        debug!(
            registration = %id,
            plan = %plan,
            base = %base_amount,
            due = %final_amount,
            order_code = %quote.order_code,
            "quoted checkout"
        );
        Ok(quote)
    }

    /// Loads a promo code definition, keeping the usage already recorded for it.
    ///
    /// Re-importing the same catalog must not hand out fresh redemptions, so
    /// the stored `used_count` wins when it is higher.
    pub async fn import_promo_code(&self, mut promo: PromoCode) -> Result<()> {
        if let Some(existing) = self.promo_store.get(&promo.code).await? {
            promo.used_count = promo.used_count.max(existing.used_count);
        }
        self.promo_store.store(promo).await
    }

    /// Records a quote issued by an earlier run as a pending registration.
    ///
    /// Registrations the store already knows are left alone, so a paid one is
    /// never reopened. Returns whether the quote was recorded.
    pub async fn reopen_quote(&self, quote: Quote) -> Result<bool> {
        let id = quote.registration;
        if quote.order_code.registration_id() != id {
            return Err(CheckoutError::ValidationError(format!(
                "order code {} does not belong to registration {}",
                quote.order_code, id
            )));
        }
        if quote.plan.party_size() != quote.party_size {
            return Err(CheckoutError::ValidationError(format!(
                "party size {} does not match plan {}",
                quote.party_size, quote.plan
            )));
        }
        if self.registration_store.get(id).await?.is_some() {
            return Ok(false);
        }

        self.registration_store
            .store(Registration {
                id,
                plan: quote.plan,
                event: None,
                party_size: quote.party_size,
                promo_code: quote.promo_code.as_deref().map(PromoCode::normalize),
                base_amount: quote.base_amount,
                amount_due: quote.final_amount,
                order_code: quote.order_code,
                status: PaymentStatus::Pending,
            })
            .await?;
        debug!(registration = %id, "reopened quote");
        Ok(true)
    }

    /// Handles a payment-success callback carrying `code`.
    ///
    /// A malformed code or an unknown registration is a hard rejection. A
    /// repeated callback for a paid registration returns it unchanged.
    pub async fn confirm_payment(&self, code: &str) -> Result<Registration> {
        let id = order_code::decode(code)?;
        let mut registration = self
            .registration_store
            .get(id)
            .await?
            .ok_or(CheckoutError::UnknownRegistration(id))?;

        if registration.is_paid() {
            warn!(registration = %id, order_code = code, "duplicate payment callback ignored");
            return Ok(registration);
        }

        if let Some(promo) = registration.promo_code.as_deref()
            && !self.promo_store.redeem(promo).await?
        {
            // The gateway already captured the money; settle and leave the
            // overdrawn code for the back office.
            warn!(registration = %id, promo, "promo code exhausted at settlement");
        }

        registration.mark_paid();
        self.registration_store.store(registration.clone()).await?;
        info!(registration = %id, amount = %registration.amount_due, "payment settled");
        Ok(registration)
    }

    /// Consumes the engine and returns every registration it has seen.
    pub async fn into_results(self) -> Result<Vec<Registration>> {
        self.registration_store.get_all().await
    }
}
