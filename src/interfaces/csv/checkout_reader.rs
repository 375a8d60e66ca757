use super::reader_from;
use crate::application::engine::Quote;
use crate::domain::registration::CheckoutRequest;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

/// Reads checkout requests from a CSV source.
///
/// Expected header:
/// `registration,plan,event,promo_code,need_invoice,tax_id,invoice_title`.
pub struct CheckoutReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CheckoutReader<R> {
    /// Creates a new `CheckoutReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: reader_from(source),
        }
    }

    /// Returns an iterator that lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<CheckoutRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}

#[derive(Debug, Deserialize)]
struct CallbackRow {
    order_code: String,
}

/// Reads payment-gateway callbacks (an `order_code` column) from a CSV source.
pub struct CallbackReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallbackReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: reader_from(source),
        }
    }

    /// Yields the raw order codes. They are not validated here.
    pub fn order_codes(self) -> impl Iterator<Item = Result<String>> {
        self.reader.into_deserialize().map(|result| {
            result
                .map(|row: CallbackRow| row.order_code)
                .map_err(CheckoutError::from)
        })
    }
}

/// Reads back the quote CSV written by [`super::report_writer::ReportWriter::write_quotes`].
pub struct QuoteReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> QuoteReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: reader_from(source),
        }
    }

    pub fn quotes(self) -> impl Iterator<Item = Result<Quote>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
