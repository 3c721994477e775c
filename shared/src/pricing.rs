//! Reservation pricing.
//!
//! Pure functions over a pair of timestamp strings and an hourly rate.
//! Partial or inverted ranges price at zero instead of failing, so a half
//! filled form never shows a negative amount. No rounding happens before the
//! display step: 1.5 hours bill at 1.5 times the hourly rate.

use crate::CURRENCY_PREFIX;
use crate::date::parse_timestamp;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Elapsed hours between `start` and `end`.
///
/// Returns 0 when either side is empty or unparsable, and when `end` is not
/// after `start`.
pub fn compute_hours(start: &str, end: &str) -> f64 {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(start), Some(end)) => {
            let elapsed = end - start;
            elapsed.as_millis() as f64 / MILLIS_PER_HOUR
        }
        _ => 0.0,
    }
}

/// `compute_hours(start, end) * hourly_rate`. Never fails; non-positive rates
/// pass straight through.
pub fn compute_price(start: &str, end: &str, hourly_rate: f64) -> f64 {
    compute_hours(start, end) * hourly_rate
}

/// Two-decimal display form of an amount.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Amount with the currency prefix, e.g. `S/ 10.00`.
pub fn format_money(amount: f64) -> String {
    format!("{CURRENCY_PREFIX} {}", format_amount(amount))
}

/// One-decimal display form of a duration in hours.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}

/// Hours and total for one time range, computed once for display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quote {
    pub hours: f64,
    pub total: f64,
}

impl Quote {
    pub fn for_range(start: &str, end: &str, hourly_rate: f64) -> Self {
        let hours = compute_hours(start, end);
        Self {
            hours,
            total: hours * hourly_rate,
        }
    }

    /// A range with no billable time.
    pub fn is_degenerate(&self) -> bool {
        self.hours <= 0.0
    }

    pub fn display_total(&self) -> String {
        format_amount(self.total)
    }

    pub fn display_hours(&self) -> String {
        format_hours(self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_price_at_zero() {
        for (start, end) in [("", ""), ("2024-01-01T10:00", ""), ("", "2024-01-01T12:00")] {
            assert_eq!(compute_hours(start, end), 0.0);
            assert_eq!(compute_price(start, end, 5.0), 0.0);
        }
    }

    #[test]
    fn unparsable_inputs_price_at_zero() {
        assert_eq!(compute_hours("soon", "2024-01-01T12:00"), 0.0);
        assert_eq!(compute_price("2024-01-01T10:00", "later", 7.5), 0.0);
    }

    #[test]
    fn inverted_and_empty_ranges_clamp_to_zero() {
        assert_eq!(compute_hours("2024-01-01T12:00", "2024-01-01T10:00"), 0.0);
        assert_eq!(compute_hours("2024-01-01T10:00", "2024-01-01T10:00"), 0.0);
        assert_eq!(compute_price("2024-01-01T12:00", "2024-01-01T10:00", 5.0), 0.0);
    }

    #[test]
    fn two_hours_at_five_is_ten() {
        let total = compute_price("2024-01-01T10:00", "2024-01-01T12:00", 5.0);
        assert_eq!(total, 10.0);
        assert_eq!(format_amount(total), "10.00");
        assert_eq!(format_money(total), "S/ 10.00");
    }

    #[test]
    fn fractional_hours_are_not_rounded_up() {
        let hours = compute_hours("2024-01-01T10:00", "2024-01-01T11:30");
        assert_eq!(hours, 1.5);
        assert_eq!(compute_price("2024-01-01T10:00", "2024-01-01T11:30", 7.5), 11.25);
        assert_eq!(format_hours(hours), "1.5");
    }

    #[test]
    fn ranges_across_days() {
        let hours = compute_hours("2024-01-01T22:00", "2024-01-02T01:00");
        assert_eq!(hours, 3.0);
    }

    #[test]
    fn rounding_happens_only_for_display() {
        let quote = Quote::for_range("2024-01-01T10:00", "2024-01-01T10:20", 1.0);
        assert!((quote.total - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(quote.display_total(), "0.33");
        assert_eq!(quote.display_hours(), "0.3");
    }

    #[test]
    fn non_positive_rates_pass_through() {
        assert_eq!(compute_price("2024-01-01T10:00", "2024-01-01T12:00", 0.0), 0.0);
        assert_eq!(compute_price("2024-01-01T10:00", "2024-01-01T12:00", -1.0), -2.0);
    }

    #[test]
    fn degenerate_quote() {
        assert!(Quote::for_range("", "", 5.0).is_degenerate());
        assert!(!Quote::for_range("2024-01-01T10:00", "2024-01-01T10:01", 5.0).is_degenerate());
    }
}
