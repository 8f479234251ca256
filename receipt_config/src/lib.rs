#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Settings schema for the receipt printer.
//!
//! - `Settings` is deserialized from a flat TOML table with upper-case keys
//!   (`SERIAL_PORT`, `FILAMENT_RATE`, ...) and validated before use.
//! - Money fields are parsed into `Decimal` from their decimal text so a rate
//!   written as `0.05` is exactly five cents, never a binary float.
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::{Deserializer, Error as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use rust_decimal;

/// How a line's exact subtotal becomes the amount charged for it.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Every line rounded to whole cents, half away from zero.
    #[default]
    Cent,
    /// As `Cent`, then 3D print lines go down to the nearest nickel.
    NickelDown,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_PAPER_COLUMNS: usize = 32;
pub const DEFAULT_HEADER_TEXT: &str = "Northville District Library";

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_paper_columns() -> usize {
    DEFAULT_PAPER_COLUMNS
}

fn default_header_text() -> String {
    DEFAULT_HEADER_TEXT.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Device the printer is attached to, e.g. `/dev/ttyUSB0` or `COM3`.
    #[serde(rename = "SERIAL_PORT")]
    pub serial_port: String,
    /// Dollars per gram of filament.
    #[serde(rename = "FILAMENT_RATE", deserialize_with = "de_decimal")]
    pub filament_rate: Decimal,
    /// Dollars per sheet of transfer paper.
    #[serde(rename = "SUBLIMATION_RATE", deserialize_with = "de_decimal")]
    pub sublimation_rate: Decimal,
    /// Dollars per mug blank.
    #[serde(rename = "MUG_RATE", deserialize_with = "de_decimal")]
    pub mug_rate: Decimal,

    #[serde(rename = "BAUD_RATE", default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Characters per line at normal text size.
    #[serde(rename = "PAPER_COLUMNS", default = "default_paper_columns")]
    pub paper_columns: usize,
    #[serde(rename = "HEADER_TEXT", default = "default_header_text")]
    pub header_text: String,
    /// Optional image replacing the bundled header logo.
    #[serde(rename = "HEADER_IMAGE", default)]
    pub header_image: Option<PathBuf>,
    #[serde(rename = "ROUNDING", default)]
    pub rounding: Rounding,

    #[serde(default)]
    pub logging: Logging,
}

/// TOML has no decimal type, so accept whatever an operator is likely to type.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalToml {
    Int(i64),
    Float(f64),
    Text(String),
}

fn de_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match DecimalToml::deserialize(deserializer)? {
        DecimalToml::Int(i) => return Ok(Decimal::from(i)),
        // f64's Display is the shortest text that round-trips, i.e. what was written
        DecimalToml::Float(f) if f.is_finite() => f.to_string(),
        DecimalToml::Float(f) => return Err(D::Error::custom(format!("not a number: {f}"))),
        DecimalToml::Text(s) => s,
    };
    let trimmed = raw.trim().trim_start_matches('$');
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| D::Error::custom(format!("invalid decimal {raw:?}: {e}")))
}

pub fn load_toml(s: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str::<Settings>(s)
}

/// Read, parse and validate a settings file.
pub fn load_settings(path: &Path) -> eyre::Result<Settings> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read settings {}: {}", path.display(), e))?;
    let settings =
        load_toml(&text).map_err(|e| eyre::eyre!("parse settings {}: {}", path.display(), e))?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.serial_port.trim().is_empty() {
            eyre::bail!("SERIAL_PORT must not be empty");
        }

        for (key, rate) in [
            ("FILAMENT_RATE", self.filament_rate),
            ("SUBLIMATION_RATE", self.sublimation_rate),
            ("MUG_RATE", self.mug_rate),
        ] {
            if rate < Decimal::ZERO {
                eyre::bail!("{key} must be >= 0, got {rate}");
            }
        }

        if self.baud_rate == 0 {
            eyre::bail!("BAUD_RATE must be > 0");
        }
        if !(16..=64).contains(&self.paper_columns) {
            eyre::bail!(
                "PAPER_COLUMNS must be in [16, 64], got {}",
                self.paper_columns
            );
        }
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rotation:?}");
        }

        Ok(())
    }
}
