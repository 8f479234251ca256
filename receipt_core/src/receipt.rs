//! Receipt assembly and ESC/POS layout.

use receipt_config::Settings;
use rust_decimal::Decimal;

use crate::error::{ReceiptError, Result};
use crate::escpos::EscPosBuilder;
use crate::job::Job;
use crate::logo::HeaderImage;
use crate::money::{format_currency, format_rate, line_charge};
use crate::rate::{compute_total, unit_rate};

/// One job on a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub job: Job,
    pub unit_rate: Decimal,
    /// Exact `quantity * unit_rate`.
    pub subtotal: Decimal,
    /// `subtotal` in whole cents after the rounding policy.
    pub charge: Decimal,
}

/// Everything needed to print, computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub title: String,
    pub header_text: String,
    pub patron: Option<String>,
    pub items: Vec<LineItem>,
    /// Exact sum of the line subtotals.
    pub total: Decimal,
    /// Sum of the line charges; what the patron pays.
    pub amount_due: Decimal,
    pub header_image: HeaderImage,
    /// Printer line width in characters at normal size.
    pub columns: usize,
}

impl Receipt {
    pub fn builder() -> ReceiptBuilder {
        ReceiptBuilder::default()
    }

    /// Single-job receipt.
    pub fn for_job(job: Job, settings: &Settings, header_image: HeaderImage) -> Result<Self> {
        Self::builder()
            .job(job)
            .header_image(header_image)
            .build(settings)
    }

    /// 3D print receipt, optionally naming who asked for it.
    pub fn filament(
        patron: Option<&str>,
        grams: Decimal,
        settings: &Settings,
        header_image: HeaderImage,
    ) -> Result<Self> {
        let mut b = Self::builder()
            .job(Job::filament(grams))
            .header_image(header_image);
        if let Some(name) = patron {
            b = b.patron(name);
        }
        b.build(settings)
    }

    /// Transfer sheets plus any mug blanks sold with them; no mug line when
    /// no mugs were sold.
    pub fn sublimation(
        pages: u32,
        mugs: u32,
        settings: &Settings,
        header_image: HeaderImage,
    ) -> Result<Self> {
        let mut b = Self::builder()
            .job(Job::sublimation(pages))
            .header_image(header_image);
        if mugs > 0 {
            b = b.job(Job::mug(mugs));
        }
        b.build(settings)
    }

    /// The job of a single-item receipt (the first job otherwise).
    pub fn job(&self) -> Option<&Job> {
        self.items.first().map(|i| &i.job)
    }
}

/// Builder for receipts with one or more line items.
#[derive(Debug, Default)]
pub struct ReceiptBuilder {
    patron: Option<String>,
    jobs: Vec<Job>,
    header_image: HeaderImage,
}

impl ReceiptBuilder {
    pub fn patron(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim();
        self.patron = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn header_image(mut self, image: HeaderImage) -> Self {
        self.header_image = image;
        self
    }

    pub fn build(self, settings: &Settings) -> Result<Receipt> {
        let first = self.jobs.first().ok_or(ReceiptError::EmptyReceipt)?;
        let title = first.kind.title().to_string();

        let mut items = Vec::with_capacity(self.jobs.len());
        let mut total = Decimal::ZERO;
        let mut amount_due = Decimal::ZERO;
        for job in self.jobs {
            let too_large = ReceiptError::InvalidQuantity {
                kind: job.kind,
                quantity: job.quantity,
                reason: "too large",
            };
            let subtotal = compute_total(&job, settings)?;
            let charge = line_charge(job.kind, subtotal, settings.rounding);
            total = total.checked_add(subtotal).ok_or(too_large.clone())?;
            amount_due = amount_due.checked_add(charge).ok_or(too_large)?;
            items.push(LineItem {
                job,
                unit_rate: unit_rate(job.kind, settings),
                subtotal,
                charge,
            });
        }

        Ok(Receipt {
            title,
            header_text: settings.header_text.clone(),
            patron: self.patron,
            items,
            total,
            amount_due,
            header_image: self.header_image,
            columns: settings.paper_columns,
        })
    }
}

const LABEL_WIDTH: usize = 8;

/// Lay the receipt out as ESC/POS bytes.
pub fn format_receipt(receipt: &Receipt) -> Vec<u8> {
    let mut b = EscPosBuilder::new(receipt.columns);

    // Header
    b.center();
    if !receipt.header_image.is_empty() {
        b.raw(receipt.header_image.raster());
    }
    b.line_fit(&receipt.header_text);

    b.center().bold(true).line_fit(&receipt.title).bold(false);
    b.newline();

    b.left().double_size();
    if let Some(patron) = &receipt.patron {
        b.line_fit(patron).newline();
    }
    for item in &receipt.items {
        let kind = item.job.kind;
        labeled_line(&mut b, kind.label(), &item.job.quantity_text());
        labeled_line(&mut b, "Rate", &format_rate(item.unit_rate, kind.unit()));
    }
    b.newline();
    labeled_line(&mut b, "Cost", &format_currency(receipt.amount_due));
    b.newline();
    b.reset_size();

    // Footer
    b.newline().newline();
    b.feed(3).cut();
    b.build()
}

fn labeled(label: &str, value: &str) -> String {
    format!("{:<LABEL_WIDTH$}{value}", format!("{label}:"))
}

/// `Label:  value` padded to a column when it fits, `Label: value` when only
/// that fits, otherwise the value goes on its own line. Values are never cut.
fn labeled_line(b: &mut EscPosBuilder, label: &str, value: &str) {
    let width = b.width();
    let padded = labeled(label, value);
    if padded.chars().count() <= width {
        b.line(&padded);
        return;
    }
    let compact = format!("{label}: {value}");
    if compact.chars().count() <= width {
        b.line(&compact);
    } else {
        b.line(&format!("{label}:")).line(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_padded_to_a_column() {
        assert_eq!(labeled("Pages", "3"), "Pages:  3");
        assert_eq!(labeled("Weight", "120g"), "Weight: 120g");
        assert_eq!(labeled("Cost", "$6.00"), "Cost:   $6.00");
    }

    fn lines_at(width: usize, label: &str, value: &str) -> String {
        let mut b = EscPosBuilder::new(width);
        labeled_line(&mut b, label, value);
        // skip ESC @ ESC t n
        String::from_utf8(b.build()[5..].to_vec()).unwrap()
    }

    #[test]
    fn labeled_lines_shrink_then_split_but_never_cut() {
        assert_eq!(lines_at(16, "Rate", "$0.05/g"), "Rate:   $0.05/g\n");
        assert_eq!(lines_at(16, "Rate", "$0.50/page"), "Rate: $0.50/page\n");
        assert_eq!(lines_at(16, "Weight", "12345.678g"), "Weight:\n12345.678g\n");
    }

    #[test]
    fn blank_patron_is_dropped() {
        let b = ReceiptBuilder::default().patron("   ");
        assert!(b.patron.is_none());
    }
}
