//! Serial receipt printer backed by the OS device file.
//!
//! ESC/POS printers on a USB-serial bridge accept raw bytes, so the device is
//! opened write-only and the payload written in one go. With the `hardware`
//! feature on Unix the line is switched to raw mode at the configured baud rate
//! first; without it the line keeps whatever settings the OS already applied.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};

use receipt_traits::{DriverError, PrinterDriver, PrinterHandle};

use crate::error::{HwError, Result};

#[derive(Debug, Clone, Copy)]
pub struct SerialPrinter {
    baud_rate: u32,
}

impl SerialPrinter {
    pub fn new(baud_rate: u32) -> Self {
        Self { baud_rate }
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn open_device(&self, port: &str) -> Result<File> {
        let path = device_path(port);
        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|e| HwError::Unavailable {
                port: port.to_string(),
                reason: e.to_string(),
            })?;
        #[cfg(all(feature = "hardware", unix))]
        configure_line(&file, self.baud_rate)?;
        Ok(file)
    }
}

impl PrinterDriver for SerialPrinter {
    type Handle = SerialHandle;

    fn open(&self, port: &str) -> std::result::Result<SerialHandle, DriverError> {
        let file = self.open_device(port)?;
        tracing::debug!(port, baud = self.baud_rate, "serial printer opened");
        Ok(SerialHandle {
            port: port.to_string(),
            file: Some(file),
        })
    }
}

/// Windows only reaches COM10 and above through the device namespace.
fn device_path(port: &str) -> String {
    if cfg!(windows) && !port.starts_with(r"\\") {
        format!(r"\\.\{port}")
    } else {
        port.to_string()
    }
}

/// A USB-serial adapter pulled mid-write reports ENODEV or EIO.
#[cfg(unix)]
fn device_vanished(e: &std::io::Error) -> bool {
    matches!(e.raw_os_error(), Some(libc::ENODEV | libc::EIO))
}

#[cfg(not(unix))]
fn device_vanished(_e: &std::io::Error) -> bool {
    false
}

#[derive(Debug)]
pub struct SerialHandle {
    port: String,
    file: Option<File>,
}

impl SerialHandle {
    pub fn port(&self) -> &str {
        &self.port
    }

    fn map_io(&self, e: std::io::Error) -> HwError {
        let gone = matches!(
            e.kind(),
            ErrorKind::NotFound | ErrorKind::BrokenPipe | ErrorKind::NotConnected
        ) || device_vanished(&e);
        if gone {
            HwError::Unavailable {
                port: self.port.clone(),
                reason: e.to_string(),
            }
        } else {
            HwError::Write(e.to_string())
        }
    }
}

impl PrinterHandle for SerialHandle {
    fn write(&mut self, bytes: &[u8]) -> std::result::Result<(), DriverError> {
        let Some(file) = self.file.as_mut() else {
            return Err(HwError::Unavailable {
                port: self.port.clone(),
                reason: "handle already closed".to_string(),
            }
            .into());
        };
        let res = file.write_all(bytes).and_then(|()| file.flush());
        if let Err(e) = res {
            let err = self.map_io(e);
            tracing::error!(port = %self.port, error = %err, "serial write failed");
            return Err(err.into());
        }
        tracing::debug!(port = %self.port, bytes = bytes.len(), "serial write");
        Ok(())
    }

    fn close(&mut self) -> std::result::Result<(), DriverError> {
        if let Some(file) = self.file.take() {
            #[cfg(all(feature = "hardware", unix))]
            nix::sys::termios::tcdrain(&file).map_err(|e| HwError::Io(e.into()))?;
            drop(file);
            tracing::debug!(port = %self.port, "serial printer closed");
        }
        Ok(())
    }
}

impl Drop for SerialHandle {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(all(feature = "hardware", unix))]
fn configure_line(file: &File, baud: u32) -> Result<()> {
    use nix::sys::termios::{self, BaudRate, SetArg};

    let rate = match baud {
        1200 => BaudRate::B1200,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        other => return Err(HwError::UnsupportedBaud(other)),
    };
    let mut tio = termios::tcgetattr(file).map_err(|e| HwError::Io(e.into()))?;
    termios::cfmakeraw(&mut tio);
    termios::cfsetspeed(&mut tio, rate).map_err(|e| HwError::Io(e.into()))?;
    termios::tcsetattr(file, SetArg::TCSANOW, &tio).map_err(|e| HwError::Io(e.into()))?;
    Ok(())
}
