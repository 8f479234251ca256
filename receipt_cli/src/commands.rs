//! Command execution: build receipts from arguments and send them to a driver.

use std::io::{stdin, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use receipt_core::{
    HeaderImage, Job, Receipt, ReceiptError, Settings, compute_total, format_currency,
    unit_rate,
};
use receipt_traits::PrinterDriver;
use serde_json::json;

use crate::cli::Commands;
use crate::prompt::{Prompter, run_session};

/// Everything a command needs once settings are loaded.
pub struct Context<'a, D> {
    pub settings: &'a Settings,
    pub driver: D,
    pub json: bool,
}

impl<D: PrinterDriver> Context<'_, D> {
    fn header(&self) -> Result<HeaderImage, ReceiptError> {
        HeaderImage::load(self.settings.header_image.as_deref())
    }

    fn print(&self, receipt: Receipt) -> Result<(), ReceiptError> {
        receipt_core::print_receipt(&self.driver, &self.settings.serial_port, receipt)
    }

    fn print_and_report(&self, receipt: Receipt) -> eyre::Result<()> {
        let summary = summary_json(&receipt);
        let cost = format_currency(receipt.amount_due);
        self.print(receipt)?;
        if self.json {
            println!("{}", json!({ "status": "printed", "receipt": summary }));
        } else {
            println!("Receipt printed. Cost: {cost}");
        }
        Ok(())
    }

    pub fn run(&self, cmd: Commands) -> eyre::Result<()> {
        match cmd {
            Commands::Filament { grams, patron } => {
                let receipt =
                    Receipt::filament(patron.as_deref(), grams, self.settings, self.header()?)?;
                self.print_and_report(receipt)
            }
            Commands::Sublimation { pages, mugs } => {
                let receipt = Receipt::sublimation(pages, mugs, self.settings, self.header()?)?;
                self.print_and_report(receipt)
            }
            Commands::Mug { count } => {
                let receipt = Receipt::for_job(Job::mug(count), self.settings, self.header()?)?;
                self.print_and_report(receipt)
            }
            Commands::Quote { kind, quantity } => {
                let job = Job::new(kind, quantity);
                let total = compute_total(&job, self.settings)?;
                let due = receipt_core::line_charge(kind, total, self.settings.rounding);
                if self.json {
                    println!(
                        "{}",
                        json!({
                            "kind": kind.name(),
                            "quantity": quantity.to_string(),
                            "unit_rate": unit_rate(kind, self.settings).to_string(),
                            "total": total.to_string(),
                            "amount_due": due.to_string(),
                        })
                    );
                } else {
                    println!("Total: {}", format_currency(total));
                    if due != total {
                        println!("Amount due: {}", format_currency(due));
                    }
                }
                Ok(())
            }
            Commands::SelfCheck => {
                receipt_core::check_printer(&self.driver, &self.settings.serial_port)?;
                if self.json {
                    println!(
                        "{}",
                        json!({ "status": "ok", "port": self.settings.serial_port })
                    );
                } else {
                    println!("Printer OK on {}", self.settings.serial_port);
                }
                Ok(())
            }
        }
    }

    /// Interactive menu on stdin/stdout.
    pub fn interactive(
        &self,
        shutdown: Arc<AtomicBool>,
        busy: Arc<AtomicBool>,
    ) -> eyre::Result<()> {
        // No menu without a printer.
        receipt_core::check_printer(&self.driver, &self.settings.serial_port)?;
        let header = self.header()?;
        let mut prompter = Prompter::new(stdin().lock(), stdout().lock());
        let printed = run_session(&mut prompter, self.settings, &header, &shutdown, |r| {
            busy.store(true, Ordering::SeqCst);
            let res = self.print(r);
            busy.store(false, Ordering::SeqCst);
            res
        })?;
        tracing::info!(printed, "session ended");
        Ok(())
    }
}

fn summary_json(receipt: &Receipt) -> serde_json::Value {
    let items: Vec<_> = receipt
        .items
        .iter()
        .map(|i| {
            json!({
                "kind": i.job.kind.name(),
                "quantity": i.job.quantity.to_string(),
                "unit_rate": i.unit_rate.to_string(),
                "subtotal": i.subtotal.to_string(),
                "charge": i.charge.to_string(),
            })
        })
        .collect();
    json!({
        "title": receipt.title,
        "patron": receipt.patron,
        "items": items,
        "total": receipt.total.to_string(),
        "amount_due": receipt.amount_due.to_string(),
    })
}
