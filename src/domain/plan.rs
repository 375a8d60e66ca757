use crate::domain::money::Amount;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The plans a registration can sign up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTag {
    /// One session, one attendee.
    Single,
    /// The full series, one attendee.
    Full,
    /// Two-person bundle.
    Double,
}

impl PlanTag {
    pub const ALL: [PlanTag; 3] = [PlanTag::Single, PlanTag::Full, PlanTag::Double];

    pub fn party_size(&self) -> u8 {
        match self {
            PlanTag::Double => 2,
            PlanTag::Single | PlanTag::Full => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTag::Single => "single",
            PlanTag::Full => "full",
            PlanTag::Double => "double",
        }
    }
}

impl FromStr for PlanTag {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        PlanTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s.trim())
            .ok_or_else(|| CheckoutError::UnknownPlan(s.to_string()))
    }
}

impl fmt::Display for PlanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub price: Amount,
    pub party_size: u8,
}

/// Price list supplied by whoever sells the course.
///
/// Party size is derived from the tag on insert so an entry can never claim a
/// bundle size its plan does not have.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCatalog {
    entries: HashMap<PlanTag, PlanEntry>,
}

impl PlanCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, plan: PlanTag, price: Amount) -> Self {
        self.insert(plan, price);
        self
    }

    pub fn insert(&mut self, plan: PlanTag, price: Amount) {
        self.entries.insert(
            plan,
            PlanEntry {
                price,
                party_size: plan.party_size(),
            },
        );
    }

    pub fn get(&self, plan: PlanTag) -> Option<&PlanEntry> {
        self.entries.get(&plan)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the price and party size for `plan`.
    pub fn compute_base_amount(&self, plan: PlanTag) -> Result<(Amount, u8)> {
        self.get(plan)
            .map(|entry| (entry.price, entry.party_size))
            .ok_or_else(|| CheckoutError::UnknownPlan(plan.to_string()))
    }

    /// Catalog used when no price list is supplied.
    pub fn standard() -> Self {
        Self::new()
            .with_price(PlanTag::Single, Amount::from(3000u32))
            .with_price(PlanTag::Full, Amount::from(12000u32))
            .with_price(PlanTag::Double, Amount::from(5400u32))
    }
}
