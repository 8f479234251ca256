//! Interactive operator menu: pick a job, answer a few prompts, print.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use receipt_core::{Decimal, HeaderImage, Receipt, ReceiptError, Settings};

use crate::error_fmt::describe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Filament,
    Sublimation,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "3d" | "3dp" | "filament" => Ok(MenuChoice::Filament),
            "2" | "sub" | "sublimation" => Ok(MenuChoice::Sublimation),
            "3" | "q" | "quit" | "exit" => Ok(MenuChoice::Quit),
            _ => Err(()),
        }
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// One line of input, trimmed. `None` on end of input.
    pub fn ask(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until the answer parses as `T`.
    pub fn ask_parsed<T: FromStr>(&mut self, text: &str) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(text)? else {
                return Ok(None);
            };
            match answer.parse::<T>() {
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "Invalid entry '{answer}'")?,
            }
        }
    }

    pub fn menu(&mut self) -> io::Result<Option<MenuChoice>> {
        writeln!(self.output)?;
        writeln!(self.output, "Receipt-O-Matic")?;
        writeln!(self.output, "  1) 3D Printing")?;
        writeln!(self.output, "  2) Sublimation")?;
        writeln!(self.output, "  3) Quit")?;
        self.ask_parsed("Select an option...")
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }
}

/// Run the menu until the operator quits, input ends or `shutdown` is set.
///
/// Receipt errors are shown to the operator and the menu continues; only
/// terminal I/O errors end the session. Returns the number of receipts printed.
pub fn run_session<R, W, F>(
    prompter: &mut Prompter<R, W>,
    settings: &Settings,
    header: &HeaderImage,
    shutdown: &AtomicBool,
    mut print: F,
) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(Receipt) -> Result<(), ReceiptError>,
{
    let mut printed = 0;
    while !shutdown.load(Ordering::SeqCst) {
        let receipt = match prompter.menu()? {
            None | Some(MenuChoice::Quit) => break,
            Some(MenuChoice::Filament) => {
                let Some(name) = prompter.ask("Enter Patron's Name:")? else {
                    break;
                };
                let Some(grams) = prompter.ask_parsed::<Decimal>("Enter the weight in grams:")?
                else {
                    break;
                };
                Receipt::filament(Some(&name), grams, settings, header.clone())
            }
            Some(MenuChoice::Sublimation) => {
                let Some(pages) =
                    prompter.ask_parsed::<u32>("Enter the number of pages printed:")?
                else {
                    break;
                };
                let Some(mugs) =
                    prompter.ask_parsed::<u32>("Enter the number of mugs purchased:")?
                else {
                    break;
                };
                Receipt::sublimation(pages, mugs, settings, header.clone())
            }
        };

        let cost = receipt.as_ref().map(|r| r.amount_due).ok();
        match receipt.and_then(&mut print) {
            Ok(()) => {
                printed += 1;
                if let Some(cost) = cost {
                    prompter.say(&format!(
                        "Printed. Cost: {}",
                        receipt_core::format_currency(cost)
                    ))?;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "request rejected");
                prompter.say(&describe(&e))?;
            }
        }
    }
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn settings() -> Settings {
        receipt_core::settings_from_toml(
            r#"
SERIAL_PORT = "SIM"
FILAMENT_RATE = 0.05
SUBLIMATION_RATE = 0.50
MUG_RATE = 3.00
"#,
        )
        .unwrap()
    }

    fn session(input: &str) -> (usize, Vec<Receipt>, String) {
        let mut out = Vec::new();
        let mut receipts = Vec::new();
        let n = {
            let mut p = Prompter::new(Cursor::new(input.to_string()), &mut out);
            run_session(
                &mut p,
                &settings(),
                &HeaderImage::none(),
                &AtomicBool::new(false),
                |r| {
                    receipts.push(r);
                    Ok(())
                },
            )
            .unwrap()
        };
        (n, receipts, String::from_utf8(out).unwrap())
    }

    #[test]
    fn filament_then_quit() {
        let (n, receipts, out) = session("1\nAda\n120\n3\n");
        assert_eq!(n, 1);
        assert_eq!(receipts[0].patron.as_deref(), Some("Ada"));
        assert_eq!(receipts[0].total, Decimal::new(600, 2));
        assert!(out.contains("Printed. Cost: $6.00"));
    }

    #[test]
    fn invalid_numbers_are_asked_again() {
        let (n, receipts, out) = session("2\nthree\n3\nnone\n0\nq\n");
        assert_eq!(n, 1);
        assert!(out.contains("Invalid entry 'three'"));
        assert!(out.contains("Invalid entry 'none'"));
        assert_eq!(receipts[0].items.len(), 1);
        assert!(out.contains("Printed. Cost: $1.50"));
    }

    #[test]
    fn rejected_job_returns_to_menu() {
        let (n, receipts, out) = session("1\nBob\n0\n3\n");
        assert_eq!(n, 0);
        assert!(receipts.is_empty());
        assert!(out.contains("Invalid quantity"));
    }

    #[test]
    fn printer_errors_are_shown_and_session_continues() {
        let mut out = Vec::new();
        let mut p = Prompter::new(Cursor::new("2\n1\n0\n2\n1\n0\n3\n".to_string()), &mut out);
        let mut calls = 0;
        let n = run_session(
            &mut p,
            &settings(),
            &HeaderImage::none(),
            &AtomicBool::new(false),
            |_| {
                calls += 1;
                if calls == 1 {
                    Err(ReceiptError::PrinterUnavailable("offline".into()))
                } else {
                    Ok(())
                }
            },
        )
        .unwrap();
        drop(p);
        assert_eq!(n, 1);
        assert!(String::from_utf8(out).unwrap().contains("unavailable"));
    }

    #[test]
    fn end_of_input_quits() {
        let (n, _, _) = session("1\nAda\n");
        assert_eq!(n, 0);
    }
}
