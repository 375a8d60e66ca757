use crate::application::engine::Quote;
use crate::domain::money::Amount;
use crate::domain::order_code::{OrderCode, RegistrationId};
use crate::domain::registration::{PaymentStatus, Registration};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SettlementRow<'a> {
    order_code: &'a OrderCode,
    registration: RegistrationId,
    status: PaymentStatus,
    amount_due: Amount,
}

/// Writes quotes and settlements as CSV with a header row.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Columns: `registration,plan,party_size,base_amount,discount,final_amount,order_code,promo_code`.
    pub fn write_quotes<I>(&mut self, quotes: I) -> Result<()>
    where
        I: IntoIterator<Item = Quote>,
    {
        for quote in quotes {
            self.writer.serialize(quote)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Columns: `order_code,registration,status,amount_due`.
    pub fn write_settlements<'a, I>(&mut self, registrations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Registration>,
    {
        for registration in registrations {
            self.writer.serialize(SettlementRow {
                order_code: &registration.order_code,
                registration: registration.id,
                status: registration.status,
                amount_due: registration.amount_due,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
