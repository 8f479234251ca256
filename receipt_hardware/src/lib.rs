//! Printer backends for the receipt printer.
//!
//! - `SerialPrinter`: the real thing, a serial device file.
//! - `SimulatedPrinter`: captures payloads in memory or a file and can
//!   simulate an offline, unplugged or jammed printer.
pub mod error;
pub mod serial;
pub mod simulated;

pub use error::HwError;
pub use serial::{SerialHandle, SerialPrinter};
pub use simulated::{SimulatedHandle, SimulatedPrinter};

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_traits::{PrinterDriver, PrinterHandle};

    #[test]
    fn test_simulated_printer_captures_bytes() {
        let printer = SimulatedPrinter::new();
        let mut h = printer.open("SIM").unwrap();
        h.write(b"one").unwrap();
        h.write(b"two").unwrap();
        h.close().unwrap();
        assert_eq!(printer.printed(), b"onetwo");
        assert_eq!(printer.open_count(), 1);
    }

    #[test]
    fn test_simulated_faults() {
        assert!(SimulatedPrinter::offline().open("SIM").is_err());

        let mut h = SimulatedPrinter::jammed().open("SIM").unwrap();
        let err = h.write(b"x").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HwError>(),
            Some(HwError::Write(_))
        ));

        let mut h = SimulatedPrinter::unplugged().open("SIM").unwrap();
        let err = h.write(b"x").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HwError>(),
            Some(HwError::Unavailable { .. })
        ));
    }
}
