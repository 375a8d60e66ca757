//! Application layer orchestrating a checkout.
//!
//! This module defines the `CheckoutEngine` which prices a registration, issues
//! its gateway order code, and settles it when the gateway calls back.

pub mod engine;
