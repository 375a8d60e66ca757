use crate::domain::money::Amount;
use crate::error::{CheckoutError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A promotional code as managed by the back office.
///
/// Checking a code never touches `used_count`; usage is recorded by the store
/// once the payment has settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount_type: DiscountType,
    /// Percent (0-100) for percentage codes, currency units for fixed codes.
    pub discount_value: Decimal,
    pub min_amount: Option<Amount>,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    /// Restricts the code to a single event or product.
    pub event_id: Option<u32>,
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl PromoCode {
    /// A code with no restrictions beyond being active.
    pub fn new(code: impl Into<String>, discount_type: DiscountType, discount_value: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_type,
            discount_value,
            min_amount: None,
            max_uses: None,
            used_count: 0,
            event_id: None,
            is_active: true,
            valid_from: None,
            valid_until: None,
        }
    }

    /// Key used to look codes up: trimmed and upper-cased.
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn key(&self) -> String {
        Self::normalize(&self.code)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.used_count >= max)
    }

    /// Checks every eligibility rule, stopping at the first one that fails.
    pub fn check(
        &self,
        base_amount: Amount,
        target_product: Option<u32>,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), PromoRejection> {
        if !self.is_active {
            return Err(PromoRejection::Inactive);
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return Err(PromoRejection::NotYetValid);
        }
        if self.valid_until.is_some_and(|until| now > until) {
            return Err(PromoRejection::Expired);
        }
        if self.is_exhausted() {
            return Err(PromoRejection::Exhausted);
        }
        if self.min_amount.is_some_and(|min| base_amount < min) {
            return Err(PromoRejection::BelowMinimum);
        }
        if let Some(event_id) = self.event_id
            && target_product != Some(event_id)
        {
            return Err(PromoRejection::WrongProduct);
        }
        Ok(())
    }

    /// The discount this code grants on `base_amount`, capped at `base_amount`.
    pub fn discount_on(&self, base_amount: Amount) -> Amount {
        let raw = match self.discount_type {
            // Too large to compute means more than the whole price
            DiscountType::Percentage => base_amount
                .percentage(self.discount_value)
                .unwrap_or(base_amount),
            DiscountType::Fixed => Amount::new(self.discount_value).unwrap_or(Amount::ZERO),
        };
        raw.min(base_amount)
    }
}

/// Why a promo code could not be applied to a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoRejection {
    Inactive,
    NotYetValid,
    Expired,
    Exhausted,
    BelowMinimum,
    WrongProduct,
}

impl PromoRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            PromoRejection::Inactive => "inactive",
            PromoRejection::NotYetValid => "not yet valid",
            PromoRejection::Expired => "expired",
            PromoRejection::Exhausted => "exhausted",
            PromoRejection::BelowMinimum => "below minimum",
            PromoRejection::WrongProduct => "wrong product",
        }
    }

    /// Customer-facing message.
    pub fn user_message(&self) -> &'static str {
        match self {
            PromoRejection::Inactive => "此優惠碼已停用",
            PromoRejection::NotYetValid => "此優惠碼尚未開始使用",
            PromoRejection::Expired => "此優惠碼已過期",
            PromoRejection::Exhausted => "此優惠碼已達使用上限",
            PromoRejection::BelowMinimum => "未達優惠碼最低消費金額",
            PromoRejection::WrongProduct => "此優惠碼不適用於本課程",
        }
    }
}

impl fmt::Display for PromoRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Applies an optional promo code to `base_amount` and returns the amount due.
///
/// The result is never negative and never exceeds `base_amount`.
pub fn apply_promo_code(
    base_amount: Amount,
    promo: Option<&PromoCode>,
    target_product: Option<u32>,
    now: DateTime<Utc>,
) -> Result<Amount> {
    let Some(promo) = promo else {
        return Ok(base_amount);
    };
    promo
        .check(base_amount, target_product, now)
        .map_err(CheckoutError::PromoInvalid)?;
    Ok(base_amount.saturating_sub(promo.discount_on(base_amount)))
}
