use receipt_core::{
    Decimal, HeaderImage, Job, Receipt, ReceiptError, Settings, check_printer, compute_total,
    emit_receipt, format_receipt, print_receipt, settings_from_toml,
};
use receipt_hardware::SimulatedPrinter;
use receipt_traits::PrinterDriver;

fn settings() -> Settings {
    settings_from_toml(
        r#"
SERIAL_PORT = "SIM0"
FILAMENT_RATE = 0.05
SUBLIMATION_RATE = 0.50
MUG_RATE = 3.00
"#,
    )
    .expect("valid settings")
}

fn mug_receipt(s: &Settings) -> Receipt {
    Receipt::for_job(Job::mug(2), s, HeaderImage::none()).unwrap()
}

#[test]
fn printed_bytes_are_the_formatted_receipt() {
    let s = settings();
    let printer = SimulatedPrinter::new();
    let receipt = mug_receipt(&s);
    let expected = format_receipt(&receipt);

    print_receipt(&printer, &s.serial_port, receipt).unwrap();
    assert_eq!(printer.printed(), expected);
    assert_eq!(printer.open_count(), 1);
}

#[test]
fn offline_printer_is_unavailable_and_total_is_unaffected() {
    let s = settings();
    let job = Job::mug(2);
    let before = compute_total(&job, &s).unwrap();

    let receipt = Receipt::for_job(job, &s, HeaderImage::none()).unwrap();
    let err = print_receipt(&SimulatedPrinter::offline(), &s.serial_port, receipt).unwrap_err();
    assert!(matches!(err, ReceiptError::PrinterUnavailable(_)), "{err:?}");

    assert_eq!(compute_total(&job, &s).unwrap(), before);
    assert_eq!(before, Decimal::new(600, 2));
}

#[test]
fn unplugged_handle_is_unavailable() {
    let s = settings();
    let mut handle = SimulatedPrinter::unplugged().open("SIM0").unwrap();
    let err = emit_receipt(mug_receipt(&s), &mut handle).unwrap_err();
    assert!(matches!(err, ReceiptError::PrinterUnavailable(_)), "{err:?}");
}

#[test]
fn write_failure_is_a_print_error() {
    let s = settings();
    let err = print_receipt(&SimulatedPrinter::jammed(), "SIM0", mug_receipt(&s)).unwrap_err();
    assert!(matches!(err, ReceiptError::Print(_)), "{err:?}");
}

#[test]
fn self_check_opens_and_closes() {
    let printer = SimulatedPrinter::new();
    check_printer(&printer, "SIM0").unwrap();
    assert_eq!(printer.open_count(), 1);
    assert!(printer.printed().is_empty());

    let err = check_printer(&SimulatedPrinter::offline(), "SIM0").unwrap_err();
    assert!(matches!(err, ReceiptError::PrinterUnavailable(_)));
}
