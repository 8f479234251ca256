//! Rate calculator: pure, exact, no I/O.

use receipt_config::Settings;
use rust_decimal::Decimal;

use crate::error::{ReceiptError, Result};
use crate::job::{Job, JobKind};

/// The configured price of one unit of `kind`.
pub fn unit_rate(kind: JobKind, settings: &Settings) -> Decimal {
    match kind {
        JobKind::Filament => settings.filament_rate,
        JobKind::Sublimation => settings.sublimation_rate,
        JobKind::Mug => settings.mug_rate,
    }
}

/// Reject quantities that cannot be billed.
pub fn validate_quantity(job: &Job) -> Result<()> {
    let invalid = |reason| ReceiptError::InvalidQuantity {
        kind: job.kind,
        quantity: job.quantity,
        reason,
    };
    if job.quantity <= Decimal::ZERO {
        return Err(invalid("must be greater than zero"));
    }
    if job.kind.is_counted() && !job.quantity.fract().is_zero() {
        return Err(invalid("must be a whole number"));
    }
    Ok(())
}

/// `quantity * rate` for the job's kind, exactly.
pub fn compute_total(job: &Job, settings: &Settings) -> Result<Decimal> {
    validate_quantity(job)?;
    let rate = unit_rate(job.kind, settings);
    let total = job
        .quantity
        .checked_mul(rate)
        .ok_or(ReceiptError::InvalidQuantity {
            kind: job.kind,
            quantity: job.quantity,
            reason: "too large",
        })?;
    tracing::debug!(kind = %job.kind, quantity = %job.quantity, rate = %rate, total = %total, "computed total");
    Ok(total)
}
