//! Billable jobs.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// What is being charged for. Selects the rate and the unit printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// 3D printing, charged per gram of filament.
    Filament,
    /// Sublimation transfers, charged per sheet.
    Sublimation,
    /// Mug blanks sold for sublimation.
    Mug,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [JobKind::Filament, JobKind::Sublimation, JobKind::Mug];

    /// Unit suffix used on the rate line (`$0.05/g`).
    pub fn unit(self) -> &'static str {
        match self {
            JobKind::Filament => "g",
            JobKind::Sublimation => "page",
            JobKind::Mug => "mug",
        }
    }

    /// Label of the quantity line on the receipt.
    pub fn label(self) -> &'static str {
        match self {
            JobKind::Filament => "Weight",
            JobKind::Sublimation => "Pages",
            JobKind::Mug => "Mugs",
        }
    }

    /// Pages and mugs are counted, filament is weighed.
    pub fn is_counted(self) -> bool {
        !matches!(self, JobKind::Filament)
    }

    /// Receipt title for a receipt whose first line is this kind.
    pub fn title(self) -> &'static str {
        match self {
            JobKind::Filament => "3D Print Job",
            JobKind::Sublimation | JobKind::Mug => "Sublimation",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JobKind::Filament => "filament",
            JobKind::Sublimation => "sublimation",
            JobKind::Mug => "mug",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filament" | "3dp" | "3d" | "print" => Ok(JobKind::Filament),
            "sublimation" | "sub" | "page" | "pages" => Ok(JobKind::Sublimation),
            "mug" | "mugs" | "cup" | "cups" => Ok(JobKind::Mug),
            other => Err(format!(
                "unknown job kind '{other}' (expected filament, sublimation or mug)"
            )),
        }
    }
}

/// A single billable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub kind: JobKind,
    /// Grams, pages or mugs depending on `kind`.
    pub quantity: Decimal,
}

impl Job {
    pub fn new(kind: JobKind, quantity: Decimal) -> Self {
        Self { kind, quantity }
    }

    pub fn filament(grams: Decimal) -> Self {
        Self::new(JobKind::Filament, grams)
    }

    pub fn sublimation(pages: u32) -> Self {
        Self::new(JobKind::Sublimation, Decimal::from(pages))
    }

    pub fn mug(count: u32) -> Self {
        Self::new(JobKind::Mug, Decimal::from(count))
    }

    /// Quantity as printed: `120g`, `12.5g`, `3`.
    pub fn quantity_text(&self) -> String {
        let q = self.quantity.normalize();
        match self.kind {
            JobKind::Filament => format!("{q}g"),
            JobKind::Sublimation | JobKind::Mug => q.to_string(),
        }
    }
}
