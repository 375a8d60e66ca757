use super::reader_from;
use crate::domain::money::Amount;
use crate::domain::plan::{PlanCatalog, PlanTag};
use crate::domain::promo::PromoCode;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct PlanRow {
    plan: String,
    price: Amount,
}

/// Loads a plan price list with a `plan,price` header.
///
/// Later rows override earlier ones for the same plan.
pub fn read_plan_catalog<R: Read>(source: R) -> Result<PlanCatalog> {
    let mut catalog = PlanCatalog::new();
    for row in reader_from(source).into_deserialize::<PlanRow>() {
        let row = row?;
        let plan: PlanTag = row.plan.parse()?;
        catalog.insert(plan, row.price);
    }
    Ok(catalog)
}

/// Reads promo codes from a CSV source.
///
/// Expected header: `code,discount_type,discount_value,min_amount,max_uses,
/// used_count,event_id,is_active,valid_from,valid_until`. Timestamps are RFC 3339.
pub struct PromoCodeReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PromoCodeReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: reader_from(source),
        }
    }

    pub fn promo_codes(self) -> impl Iterator<Item = Result<PromoCode>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
