use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("printer unavailable on {port}: {reason}")]
    Unavailable { port: String, reason: String },
    #[error("printer write failed: {0}")]
    Write(String),
    #[error("unsupported baud rate: {0}")]
    UnsupportedBaud(u32),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
