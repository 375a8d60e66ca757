use crate::domain::invoice::InvoiceRequest;
use crate::domain::money::Amount;
use crate::domain::order_code::{OrderCode, RegistrationId};
use crate::domain::plan::PlanTag;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

/// One checkout attempt as submitted by the registration form.
///
/// `plan` stays a raw string so an unknown plan surfaces as
/// [`CheckoutError::UnknownPlan`](crate::error::CheckoutError::UnknownPlan)
/// instead of a deserialization failure.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CheckoutRequest {
    pub registration: RegistrationId,
    pub plan: String,
    pub event: Option<u32>,
    pub promo_code: Option<String>,
    pub need_invoice: Option<bool>,
    pub tax_id: Option<String>,
    pub invoice_title: Option<String>,
}

impl CheckoutRequest {
    pub fn new(registration: RegistrationId, plan: PlanTag) -> Self {
        Self {
            registration,
            plan: plan.to_string(),
            event: None,
            promo_code: None,
            need_invoice: None,
            tax_id: None,
            invoice_title: None,
        }
    }

    pub fn plan_tag(&self) -> Result<PlanTag> {
        self.plan.parse()
    }

    /// The promo code, if one was typed in.
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    pub fn invoice(&self) -> InvoiceRequest {
        InvoiceRequest {
            need_invoice: self.need_invoice.unwrap_or(false),
            tax_id: self.tax_id.clone(),
            invoice_title: self.invoice_title.clone(),
        }
    }
}

/// A registration as tracked between quoting and the gateway callback.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Registration {
    pub id: RegistrationId,
    pub plan: PlanTag,
    pub event: Option<u32>,
    pub party_size: u8,
    /// Normalized promo code applied to this registration.
    pub promo_code: Option<String>,
    pub base_amount: Amount,
    pub amount_due: Amount,
    pub order_code: OrderCode,
    pub status: PaymentStatus,
}

impl Registration {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    pub fn discount(&self) -> Amount {
        self.base_amount.saturating_sub(self.amount_due)
    }

    pub fn mark_paid(&mut self) {
        self.status = PaymentStatus::Paid;
    }
}
