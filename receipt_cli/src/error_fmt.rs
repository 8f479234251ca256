//! Human-readable error descriptions and structured JSON error formatting.

use receipt_core::ReceiptError;

/// Explain a typed receipt error with likely causes and a fix hint.
pub fn describe(err: &ReceiptError) -> String {
    match err {
        ReceiptError::Config(msg) => format!(
            "What happened: Invalid settings ({msg}).\nLikely causes: A required key (SERIAL_PORT, FILAMENT_RATE, SUBLIMATION_RATE, MUG_RATE) is missing or not a number.\nHow to fix: Edit the settings TOML, then start the program again."
        ),
        ReceiptError::InvalidQuantity { kind, quantity, reason } => format!(
            "What happened: Invalid quantity {quantity} for {kind} ({reason}).\nLikely causes: A typo, or a zero/negative amount.\nHow to fix: Enter the amount again; the job was not charged."
        ),
        ReceiptError::PrinterUnavailable(msg) => format!(
            "What happened: The receipt printer is unavailable ({msg}).\nLikely causes: Printer off or unplugged, wrong SERIAL_PORT, or no permission to open the port.\nHow to fix: Check power and cable, verify SERIAL_PORT, then print the receipt again."
        ),
        ReceiptError::Print(msg) => format!(
            "What happened: The printer rejected the receipt ({msg}).\nLikely causes: Paper out, cover open, or a paper jam.\nHow to fix: Clear the printer, then print the receipt again."
        ),
        ReceiptError::HeaderImage(msg) => format!(
            "What happened: The header image could not be loaded ({msg}).\nLikely causes: HEADER_IMAGE points to a missing or non-PNG file.\nHow to fix: Fix or remove HEADER_IMAGE in the settings."
        ),
        ReceiptError::EmptyReceipt => {
            "What happened: Nothing to charge.\nHow to fix: Add at least one job to the receipt.".to_string()
        }
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(re) = err.downcast_ref::<ReceiptError>() {
        return describe(re);
    }

    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable machine-readable name of the error kind.
pub fn error_kind_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<ReceiptError>() {
        Some(ReceiptError::Config(_)) => "ConfigError",
        Some(ReceiptError::InvalidQuantity { .. }) => "InvalidQuantity",
        Some(ReceiptError::PrinterUnavailable(_)) => "PrinterUnavailable",
        Some(ReceiptError::Print(_)) => "PrintError",
        Some(ReceiptError::HeaderImage(_)) => "HeaderImageError",
        Some(ReceiptError::EmptyReceipt) => "EmptyReceipt",
        None => "Error",
    }
}

/// Stable exit codes per error kind; anything untyped returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<ReceiptError>() {
        Some(ReceiptError::Config(_) | ReceiptError::HeaderImage(_)) => 3,
        Some(ReceiptError::InvalidQuantity { .. }) => 4,
        Some(ReceiptError::PrinterUnavailable(_)) => 5,
        Some(ReceiptError::Print(_)) => 6,
        Some(ReceiptError::EmptyReceipt) | None => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let mut obj = json!({
        "reason": error_kind_name(err),
        "message": humanize(err),
    });
    if let Some(ReceiptError::InvalidQuantity {
        kind,
        quantity,
        reason,
    }) = err.downcast_ref::<ReceiptError>()
    {
        obj["details"] = json!({
            "kind": kind.name(),
            "quantity": quantity.to_string(),
            "reason": reason,
        });
    }
    obj.to_string()
}
