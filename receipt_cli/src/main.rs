mod cli;
mod commands;
mod error_fmt;
mod logging;
mod prompt;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use receipt_hardware::{SerialPrinter, SimulatedPrinter};

use crate::cli::{Cli, JSON_MODE};
use crate::commands::Context;
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let verbose = cli.verbose();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "exiting with error");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
            if verbose {
                eprintln!("{e:?}");
            }
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    // Logging needs the [logging] table, so settings are read first; a bad
    // file still gets console logging before the error is reported.
    let settings = receipt_core::load_settings(&cli.config);
    logging::init_tracing(
        cli.json,
        &cli.log_level,
        settings.as_ref().ok().map(|s| &s.logging),
    )?;
    let settings = settings?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let busy = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        let busy = busy.clone();
        ctrlc::set_handler(move || {
            // Let a receipt in flight finish; otherwise leave right away.
            if busy.load(Ordering::SeqCst) {
                shutdown.store(true, Ordering::SeqCst);
            } else {
                std::process::exit(130);
            }
        })?;
    }

    match cli.simulate {
        Some(path) => {
            tracing::info!(path = %path.display(), "simulated printer");
            let ctx = Context {
                settings: &settings,
                driver: SimulatedPrinter::to_file(path),
                json: cli.json,
            };
            dispatch(&ctx, cli.cmd, shutdown, busy)
        }
        None => {
            let ctx = Context {
                settings: &settings,
                driver: SerialPrinter::new(settings.baud_rate),
                json: cli.json,
            };
            dispatch(&ctx, cli.cmd, shutdown, busy)
        }
    }
}

fn dispatch<D: receipt_traits::PrinterDriver>(
    ctx: &Context<'_, D>,
    cmd: Option<cli::Commands>,
    shutdown: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
) -> eyre::Result<()> {
    match cmd {
        Some(cmd) => ctx.run(cmd),
        None => ctx.interactive(shutdown, busy),
    }
}
