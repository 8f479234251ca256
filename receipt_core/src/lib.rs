#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Receipt logic (hardware-agnostic).
//!
//! All printer access goes through `receipt_traits::PrinterDriver` and
//! `receipt_traits::PrinterHandle`.
//!
//! ## Architecture
//!
//! - **Rates**: exact `Decimal` totals per job (`rate` module)
//! - **Money**: currency text and per-line charges (`money` module)
//! - **Layout**: ESC/POS builder and header logo (`escpos`, `logo`)
//! - **Receipts**: line items, totals, formatting (`receipt` module)
//! - **Emission**: open/write/close with typed errors (`emit` module)
//!
//! The flow is linear: load settings, build a job, compute the total,
//! format, emit. Calculation never depends on the printer.

pub mod emit;
pub mod error;
pub mod escpos;
pub mod hw_error;
pub mod job;
pub mod logo;
pub mod money;
pub mod rate;
pub mod receipt;

pub use emit::{check_printer, emit_receipt, print_receipt};
pub use error::{ReceiptError, Result};
pub use job::{Job, JobKind};
pub use logo::HeaderImage;
pub use money::{format_currency, line_charge, round_cents};
pub use rate::{compute_total, unit_rate};
pub use receipt::{LineItem, Receipt, ReceiptBuilder, format_receipt};

pub use rust_decimal::Decimal;
pub use receipt_config::{Rounding, Settings};

/// Load and validate settings; any problem is a fatal `ReceiptError::Config`.
pub fn load_settings(path: &std::path::Path) -> Result<Settings> {
    let settings =
        receipt_config::load_settings(path).map_err(|e| ReceiptError::Config(format!("{e:#}")))?;
    tracing::info!(
        path = %path.display(),
        port = %settings.serial_port,
        rounding = ?settings.rounding,
        "settings loaded"
    );
    Ok(settings)
}

/// Same as `load_settings` for settings already in memory.
pub fn settings_from_toml(text: &str) -> Result<Settings> {
    let settings =
        receipt_config::load_toml(text).map_err(|e| ReceiptError::Config(e.to_string()))?;
    settings
        .validate()
        .map_err(|e| ReceiptError::Config(format!("{e:#}")))?;
    Ok(settings)
}
