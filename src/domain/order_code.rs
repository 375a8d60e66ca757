//! Order codes handed to the payment gateway.
//!
//! A code embeds the registration it pays for, so the gateway callback can be
//! routed back without any lookup table:
//!
//! ```text
//! C26_<registration>_<last 8 digits of the epoch millis>        (current)
//! COURSE2026_<registration>_<13-digit epoch millis>             (legacy, decode only)
//! ```

use crate::error::{CheckoutError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hard limit of the gateway's order-number field, in ASCII characters.
pub const GATEWAY_FIELD_LIMIT: usize = 30;

const SEPARATOR: char = '_';
const SUFFIX_MODULUS: i64 = 100_000_000;

/// Identifier assigned to a registration by the registration store.
///
/// Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RegistrationId(u32);

impl RegistrationId {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(CheckoutError::ValidationError(
                "Registration id must be positive".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RegistrationId {
    type Error = CheckoutError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RegistrationId> for u32 {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recognized order-code format.
///
/// Decoding walks [`OrderCodeDialect::RECOGNIZED`] in order, so a new format is
/// added by appending a variant rather than touching [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCodeDialect {
    Current,
    Legacy,
}

impl OrderCodeDialect {
    pub const RECOGNIZED: [OrderCodeDialect; 2] = [OrderCodeDialect::Current, OrderCodeDialect::Legacy];

    pub fn prefix(&self) -> &'static str {
        match self {
            OrderCodeDialect::Current => "C26_",
            OrderCodeDialect::Legacy => "COURSE2026_",
        }
    }

    /// Parses what follows the prefix. The timestamp segment is not inspected.
    fn parse_body(&self, body: &str) -> Option<RegistrationId> {
        match self {
            OrderCodeDialect::Current | OrderCodeDialect::Legacy => {
                let id = body.split(SEPARATOR).next()?;
                parse_decimal_id(id)
            }
        }
    }
}

fn parse_decimal_id(segment: &str) -> Option<RegistrationId> {
    // `u32::from_str` accepts a leading '+', the wire format does not
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment
        .parse::<u32>()
        .ok()
        .and_then(|v| RegistrationId::new(v).ok())
}

/// A gateway-compliant order code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderCode {
    code: String,
    registration: RegistrationId,
}

impl OrderCode {
    /// Encodes `id` using the current wall-clock time.
    pub fn encode(id: RegistrationId) -> Self {
        Self::encode_at(id, Utc::now().timestamp_millis())
    }

    /// Encodes `id` with an explicit epoch timestamp in milliseconds.
    ///
    /// Only the last 8 digits of the timestamp are kept (left-padded with zeros).
    pub fn encode_at(id: RegistrationId, epoch_millis: i64) -> Self {
        let suffix = epoch_millis.rem_euclid(SUFFIX_MODULUS);
        Self {
            code: format!(
                "{prefix}{id}{SEPARATOR}{suffix:08}",
                prefix = OrderCodeDialect::Current.prefix(),
            ),
            registration: id,
        }
    }

    /// Validates a code received from the gateway.
    pub fn parse(code: &str) -> Result<Self> {
        let registration = decode(code)?;
        Ok(Self {
            code: code.to_string(),
            registration,
        })
    }

    /// The registration this code was issued for.
    pub fn registration_id(&self) -> RegistrationId {
        self.registration
    }

    pub fn dialect(&self) -> OrderCodeDialect {
        OrderCodeDialect::RECOGNIZED
            .into_iter()
            .find(|d| self.code.starts_with(d.prefix()))
            .unwrap_or(OrderCodeDialect::Current)
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Recovers the registration id from a code in any recognized dialect.
pub fn decode(code: &str) -> Result<RegistrationId> {
    OrderCodeDialect::RECOGNIZED
        .iter()
        .find_map(|dialect| {
            code.strip_prefix(dialect.prefix())
                .map(|body| dialect.parse_body(body))
        })
        .flatten()
        .ok_or_else(|| CheckoutError::MalformedOrderCode(code.to_string()))
}

impl FromStr for OrderCode {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderCode {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self> {
        let registration = decode(&value)?;
        Ok(Self {
            code: value,
            registration,
        })
    }
}

impl From<OrderCode> for String {
    fn from(code: OrderCode) -> Self {
        code.code
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
