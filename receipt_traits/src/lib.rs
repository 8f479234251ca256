//! Narrow printer seam shared by the core and the hardware backends.
//!
//! The core only ever needs to open a port, push bytes and close it again.
//! Everything else (line discipline, capability profiles) belongs to the
//! driver behind these traits.

pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// An opened connection to a receipt printer.
pub trait PrinterHandle {
    /// Write a complete payload. Implementations must not return until the
    /// bytes were handed to the device (or failed).
    fn write(&mut self, bytes: &[u8]) -> Result<(), DriverError>;

    /// Flush and release the device. Calling `close` twice is a no-op.
    fn close(&mut self) -> Result<(), DriverError>;
}

/// Opens printer handles by port name (e.g. `/dev/ttyUSB0`, `COM3`).
pub trait PrinterDriver {
    type Handle: PrinterHandle;

    fn open(&self, port: &str) -> Result<Self::Handle, DriverError>;
}

impl<H: PrinterHandle + ?Sized> PrinterHandle for Box<H> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        (**self).write(bytes)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        (**self).close()
    }
}

impl<H: PrinterHandle + ?Sized> PrinterHandle for &mut H {
    fn write(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        (**self).write(bytes)
    }

    fn close(&mut self) -> Result<(), DriverError> {
        (**self).close()
    }
}
