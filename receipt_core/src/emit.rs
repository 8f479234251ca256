//! Receipt emission: format, open, write, close. No retries.

use receipt_traits::{PrinterDriver, PrinterHandle};

use crate::error::Result;
use crate::hw_error::{Stage, map_hw_error};
use crate::receipt::{Receipt, format_receipt};

/// Send `receipt` to an already opened printer.
///
/// The receipt is consumed; a failed print must be rebuilt and retried by the
/// operator.
pub fn emit_receipt<H: PrinterHandle + ?Sized>(
    receipt: Receipt,
    printer: &mut H,
) -> Result<()> {
    let payload = format_receipt(&receipt);
    printer.write(&payload).map_err(|e| {
        let err = map_hw_error(&*e, Stage::Write);
        tracing::error!(error = %err, "receipt not printed");
        err
    })?;
    tracing::info!(
        title = %receipt.title,
        items = receipt.items.len(),
        amount_due = %receipt.amount_due,
        bytes = payload.len(),
        "receipt printed"
    );
    Ok(())
}

/// Open `port`, emit, close. The handle is closed even when the write fails.
pub fn print_receipt<D: PrinterDriver>(
    driver: &D,
    port: &str,
    receipt: Receipt,
) -> Result<()> {
    let mut handle = driver
        .open(port)
        .map_err(|e| map_hw_error(&*e, Stage::Open))?;
    let res = emit_receipt(receipt, &mut handle);
    let closed = handle
        .close()
        .map_err(|e| map_hw_error(&*e, Stage::Close));
    res?;
    closed
}

/// Startup probe: the port can be opened and closed again.
pub fn check_printer<D: PrinterDriver>(driver: &D, port: &str) -> Result<()> {
    let mut handle = driver
        .open(port)
        .map_err(|e| map_hw_error(&*e, Stage::Open))?;
    handle
        .close()
        .map_err(|e| map_hw_error(&*e, Stage::Close))?;
    tracing::info!(port, "printer reachable");
    Ok(())
}
