//! Maps `Box<dyn Error>` from the printer seam to typed `ReceiptError`.
//!
//! The traits in `receipt_traits` use `Box<dyn Error + Send + Sync>` so any
//! driver can plug in; this module converts those back, with an optional
//! feature-gated path for `receipt_hardware::HwError` downcasting.

use crate::error::ReceiptError;

/// Which printer call produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Open,
    Write,
    Close,
}

/// Map a driver error to `PrinterUnavailable` or `Print`.
///
/// A failed open is always `PrinterUnavailable`. For writes, known hardware
/// errors are downcast first, then string heuristics decide.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static), stage: Stage) -> ReceiptError {
    if stage == Stage::Open {
        return ReceiptError::PrinterUnavailable(e.to_string());
    }

    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<receipt_hardware::HwError>() {
            return match hw {
                receipt_hardware::HwError::Unavailable { .. } => {
                    ReceiptError::PrinterUnavailable(hw.to_string())
                }
                other => ReceiptError::Print(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("unavailable")
        || lower.contains("disconnected")
        || lower.contains("no such device")
        || lower.contains("not connected")
    {
        ReceiptError::PrinterUnavailable(s)
    } else {
        ReceiptError::Print(s)
    }
}
