//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use receipt_core::{Decimal, JobKind};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "receipt-o-matic",
    version,
    about = "Print makerspace cost receipts on a serial thermal printer"
)]
pub struct Cli {
    /// Path to the settings TOML
    #[arg(long, value_name = "FILE", default_value = "settings.toml")]
    pub config: PathBuf,

    /// Emit results and errors as JSON; logs become JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Do not touch the serial port; append the ESC/POS bytes to FILE instead
    #[arg(long, value_name = "FILE")]
    pub simulate: Option<PathBuf>,

    /// Command to execute; without one an interactive menu is shown
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "debug" | "trace"
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a 3D printing receipt, charged by filament weight
    Filament {
        /// Final weight of all parts in grams
        #[arg(long, allow_negative_numbers = true)]
        grams: Decimal,
        /// Name of the patron who requested the job
        #[arg(long)]
        patron: Option<String>,
    },
    /// Print a sublimation receipt, charged per transfer sheet
    Sublimation {
        /// Number of pages printed
        #[arg(long)]
        pages: u32,
        /// Mug blanks sold with the transfers
        #[arg(long, default_value_t = 0)]
        mugs: u32,
    },
    /// Print a receipt for mug blanks only
    Mug {
        /// Number of mugs sold
        #[arg(long)]
        count: u32,
    },
    /// Show the charge for a job without printing
    Quote {
        /// filament, sublimation or mug
        kind: JobKind,
        /// Grams, pages or mugs
        #[arg(allow_negative_numbers = true)]
        quantity: Decimal,
    },
    /// Open and close the printer port
    SelfCheck,
}
