//! Currency formatting and the amount charged per line.
//!
//! Subtotals are exact `Decimal` products. Each line is turned into whole
//! cents once, according to `Settings::rounding`; the amount due is the sum
//! of those line charges.

use receipt_config::Rounding;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::job::JobKind;

const CENT_PLACES: u32 = 2;
const NICKELS_PER_DOLLAR: i64 = 20;

/// Show at least two decimals and never drop significant digits.
///
/// `6` -> `$6.00`, `0.5` -> `$0.50`, `0.035` -> `$0.035`.
pub fn format_currency(amount: Decimal) -> String {
    let mut d = amount.normalize();
    if d.scale() < CENT_PLACES {
        d.rescale(CENT_PLACES);
    }
    format!("${d}")
}

/// `$0.05/g`, `$3.00/mug`.
pub fn format_rate(rate: Decimal, unit: &str) -> String {
    format!("{}/{unit}", format_currency(rate))
}

/// Whole cents, half away from zero, always two decimals.
pub fn round_cents(d: Decimal) -> Decimal {
    let mut r = d.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero);
    r.rescale(CENT_PLACES);
    r
}

/// Round to cents, then down to the nearest nickel.
pub fn nickel_down(d: Decimal) -> Decimal {
    let twenty = Decimal::from(NICKELS_PER_DOLLAR);
    let mut r = (round_cents(d) * twenty).floor() / twenty;
    r.rescale(CENT_PLACES);
    r
}

/// What the patron pays for one line with exact `subtotal`.
///
/// Only 3D print lines follow the nickel rule; sublimation pages and mugs
/// are charged to the cent.
pub fn line_charge(kind: JobKind, subtotal: Decimal, mode: Rounding) -> Decimal {
    match (mode, kind) {
        (Rounding::NickelDown, JobKind::Filament) => nickel_down(subtotal),
        _ => round_cents(subtotal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("6", "$6.00")]
    #[case("6.000", "$6.00")]
    #[case("0.5", "$0.50")]
    #[case("1.50", "$1.50")]
    #[case("0.035", "$0.035")]
    #[case("0", "$0.00")]
    fn currency_has_two_decimals_minimum(#[case] input: &str, #[case] want: &str) {
        assert_eq!(format_currency(d(input)), want);
    }

    #[rstest]
    #[case("6.04", "6.00")]
    #[case("6.07", "6.05")]
    #[case("6.05", "6.05")]
    #[case("6.099", "6.10")]
    #[case("6.0449", "6.00")]
    #[case("0.01", "0.00")]
    fn nickel_rule(#[case] input: &str, #[case] want: &str) {
        assert_eq!(nickel_down(d(input)).to_string(), want);
    }

    #[rstest]
    #[case("1.005", "1.01")]
    #[case("1.004", "1.00")]
    #[case("4.305", "4.31")]
    #[case("2", "2.00")]
    fn cent_rounding(#[case] input: &str, #[case] want: &str) {
        assert_eq!(round_cents(d(input)).to_string(), want);
    }

    #[rstest]
    #[case(JobKind::Filament, "6.07", Rounding::NickelDown, "6.05")]
    #[case(JobKind::Filament, "6.07", Rounding::Cent, "6.07")]
    #[case(JobKind::Sublimation, "0.99", Rounding::NickelDown, "0.99")]
    #[case(JobKind::Mug, "3.33", Rounding::NickelDown, "3.33")]
    #[case(JobKind::Filament, "4.305", Rounding::Cent, "4.31")]
    fn nickel_rule_only_touches_3d_prints(
        #[case] kind: JobKind,
        #[case] subtotal: &str,
        #[case] mode: Rounding,
        #[case] want: &str,
    ) {
        assert_eq!(line_charge(kind, d(subtotal), mode).to_string(), want);
    }

    #[test]
    fn rate_line_text() {
        assert_eq!(format_rate(d("0.05"), "g"), "$0.05/g");
        assert_eq!(format_rate(d("3"), "mug"), "$3.00/mug");
    }
}
