use rust_decimal::Decimal;
use thiserror::Error;

use crate::job::JobKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReceiptError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid quantity {quantity} for {kind}: {reason}")]
    InvalidQuantity {
        kind: JobKind,
        quantity: Decimal,
        reason: &'static str,
    },
    #[error("printer unavailable: {0}")]
    PrinterUnavailable(String),
    #[error("print error: {0}")]
    Print(String),
    #[error("header image error: {0}")]
    HeaderImage(String),
    #[error("receipt has no line items")]
    EmptyReceipt,
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
