//! Pure checkout rules: order codes, plan prices, promo codes and invoices.
//!
//! Nothing in here performs I/O except through the traits in [`ports`].

pub mod invoice;
pub mod money;
pub mod order_code;
pub mod plan;
pub mod ports;
pub mod promo;
pub mod registration;
