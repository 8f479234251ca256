//! In-process printer used by `--simulate` and the test suites.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use receipt_traits::{DriverError, PrinterDriver, PrinterHandle};

use crate::error::HwError;

#[derive(Debug, Clone)]
enum Sink {
    Memory(Rc<RefCell<Vec<u8>>>),
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    Offline,
    Unplugged,
    Jammed,
}

/// Simulated receipt printer.
///
/// Captured bytes are shared between the driver and every handle it opens,
/// so tests can keep the driver and inspect `printed()` after the job.
#[derive(Debug, Clone)]
pub struct SimulatedPrinter {
    sink: Sink,
    fault: Fault,
    opens: Rc<RefCell<u32>>,
}

impl Default for SimulatedPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPrinter {
    pub fn new() -> Self {
        Self {
            sink: Sink::Memory(Rc::new(RefCell::new(Vec::new()))),
            fault: Fault::None,
            opens: Rc::new(RefCell::new(0)),
        }
    }

    /// Append every payload to `path`, e.g. for `hexdump`-ing a receipt.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            sink: Sink::File(path.into()),
            ..Self::new()
        }
    }

    /// Opening any port fails as if the device were missing.
    pub fn offline() -> Self {
        Self {
            fault: Fault::Offline,
            ..Self::new()
        }
    }

    /// Opens fine, then the device disappears on the first write.
    pub fn unplugged() -> Self {
        Self {
            fault: Fault::Unplugged,
            ..Self::new()
        }
    }

    /// Opens fine, every write is rejected by the device.
    pub fn jammed() -> Self {
        Self {
            fault: Fault::Jammed,
            ..Self::new()
        }
    }

    /// Bytes captured so far (empty for file-backed printers).
    pub fn printed(&self) -> Vec<u8> {
        match &self.sink {
            Sink::Memory(buf) => buf.borrow().clone(),
            Sink::File(_) => Vec::new(),
        }
    }

    pub fn open_count(&self) -> u32 {
        *self.opens.borrow()
    }
}

impl PrinterDriver for SimulatedPrinter {
    type Handle = SimulatedHandle;

    fn open(&self, port: &str) -> Result<SimulatedHandle, DriverError> {
        if self.fault == Fault::Offline {
            return Err(HwError::Unavailable {
                port: port.to_string(),
                reason: "simulated printer is offline".to_string(),
            }
            .into());
        }
        *self.opens.borrow_mut() += 1;
        tracing::debug!(port, "simulated printer opened");
        Ok(SimulatedHandle {
            port: port.to_string(),
            sink: self.sink.clone(),
            fault: self.fault,
            open: true,
        })
    }
}

#[derive(Debug)]
pub struct SimulatedHandle {
    port: String,
    sink: Sink,
    fault: Fault,
    open: bool,
}

impl PrinterHandle for SimulatedHandle {
    fn write(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        if !self.open || self.fault == Fault::Unplugged {
            return Err(HwError::Unavailable {
                port: self.port.clone(),
                reason: "device disconnected".to_string(),
            }
            .into());
        }
        if self.fault == Fault::Jammed {
            return Err(HwError::Write("paper jam".to_string()).into());
        }
        match &self.sink {
            Sink::Memory(buf) => buf.borrow_mut().extend_from_slice(bytes),
            Sink::File(path) => {
                let mut f = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(HwError::Io)?;
                f.write_all(bytes).map_err(HwError::Io)?;
            }
        }
        tracing::info!(port = %self.port, bytes = bytes.len(), "printed (simulated)");
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.open = false;
        Ok(())
    }
}
