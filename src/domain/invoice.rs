use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const TAX_ID_DIGITS: usize = 8;

/// Billing fields attached to a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub need_invoice: bool,
    pub tax_id: Option<String>,
    pub invoice_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceRejection {
    TaxIdInvalid,
    TitleMissing,
}

impl InvoiceRejection {
    pub fn user_message(&self) -> &'static str {
        match self {
            InvoiceRejection::TaxIdInvalid => "統一編號必須為 8 位數字",
            InvoiceRejection::TitleMissing => "請輸入發票抬頭",
        }
    }
}

impl fmt::Display for InvoiceRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceRejection::TaxIdInvalid => f.write_str("tax ID must be 8 digits"),
            InvoiceRejection::TitleMissing => f.write_str("invoice title required"),
        }
    }
}

fn is_tax_id(value: &str) -> bool {
    value.len() == TAX_ID_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

/// Every problem with `req`, tax ID first.
pub fn invoice_issues(req: &InvoiceRequest) -> Vec<InvoiceRejection> {
    if !req.need_invoice {
        return Vec::new();
    }
    let mut issues = Vec::new();
    if !req.tax_id.as_deref().is_some_and(is_tax_id) {
        issues.push(InvoiceRejection::TaxIdInvalid);
    }
    if req
        .invoice_title
        .as_deref()
        .is_none_or(|title| title.trim().is_empty())
    {
        issues.push(InvoiceRejection::TitleMissing);
    }
    issues
}

/// Rejects a request for a formal invoice that lacks a valid tax ID or title.
pub fn validate_invoice_request(req: &InvoiceRequest) -> Result<()> {
    match invoice_issues(req).first() {
        Some(issue) => Err(CheckoutError::InvoiceFieldInvalid(*issue)),
        None => Ok(()),
    }
}
