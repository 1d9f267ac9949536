//! VAT rate timeline resolution.
//!
//! Tenants configure a base rate plus a history of dated rate changes
//! (for example South Africa's move from 14% to 15% on 2018-04-01).
//! Resolution picks the latest entry effective on or before the document
//! date; with no qualifying entry the base rate applies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::NumberingError;

/// One step in a tenant's VAT rate timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatRateEntry {
    /// Rate as a decimal fraction, e.g. `0.15` for 15%.
    pub rate: Decimal,
    /// First date (inclusive) on which the rate applies.
    pub effective_date: NaiveDate,
    /// Free-text annotation, e.g. the gazette or budget reference.
    pub notes: Option<String>,
}

impl VatRateEntry {
    pub fn new(rate: Decimal, effective_date: NaiveDate) -> Self {
        Self {
            rate,
            effective_date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Resolve the VAT rate in force on `on`.
///
/// Scans the whole history, so the input does not need to be sorted.
pub fn resolve_rate(history: &[VatRateEntry], base_rate: Decimal, on: NaiveDate) -> Decimal {
    history
        .iter()
        .filter(|entry| entry.effective_date <= on)
        .max_by_key(|entry| entry.effective_date)
        .map(|entry| entry.rate)
        .unwrap_or(base_rate)
}

/// Insert a rate change into a history, keeping it sorted ascending by
/// effective date. Past-dated entries are allowed so an existing timeline
/// can be backfilled.
pub fn add_rate_entry(
    history: &mut Vec<VatRateEntry>,
    entry: VatRateEntry,
) -> Result<(), NumberingError> {
    validate_rate(entry.rate)?;
    if history
        .iter()
        .any(|existing| existing.effective_date == entry.effective_date)
    {
        return Err(NumberingError::DuplicateEffectiveDate {
            date: entry.effective_date,
        });
    }
    history.push(entry);
    history.sort_by_key(|e| e.effective_date);
    Ok(())
}

/// Check that a rate is a fraction in `[0, 1]`.
pub fn validate_rate(rate: Decimal) -> Result<(), NumberingError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(NumberingError::InvalidRate { rate });
    }
    Ok(())
}

/// VAT amount on a net amount at the given rate, rounded half-up to
/// 2 decimal places (commercial rounding).
pub fn vat_portion(net: Decimal, rate: Decimal) -> Decimal {
    (net * rate).round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sa_history() -> Vec<VatRateEntry> {
        vec![
            VatRateEntry::new(dec!(0.14), date(2018, 1, 1)),
            VatRateEntry::new(dec!(0.15), date(2025, 4, 1)),
        ]
    }

    #[test]
    fn resolves_latest_entry_on_or_before_date() {
        let history = sa_history();
        assert_eq!(resolve_rate(&history, dec!(0.14), date(2025, 3, 31)), dec!(0.14));
        assert_eq!(resolve_rate(&history, dec!(0.14), date(2025, 4, 1)), dec!(0.15));
        assert_eq!(resolve_rate(&history, dec!(0.14), date(2026, 1, 1)), dec!(0.15));
    }

    #[test]
    fn falls_back_to_base_rate_before_first_entry() {
        let history = sa_history();
        assert_eq!(resolve_rate(&history, dec!(0.14), date(2017, 6, 30)), dec!(0.14));
        assert_eq!(resolve_rate(&[], dec!(0.15), date(2025, 6, 1)), dec!(0.15));
    }

    #[test]
    fn resolution_ignores_input_order() {
        let mut history = sa_history();
        history.reverse();
        assert_eq!(resolve_rate(&history, dec!(0.14), date(2025, 4, 1)), dec!(0.15));
        assert_eq!(resolve_rate(&history, dec!(0.14), date(2024, 12, 31)), dec!(0.14));
    }

    #[test]
    fn add_keeps_history_sorted() {
        let mut history = vec![VatRateEntry::new(dec!(0.15), date(2025, 4, 1))];
        add_rate_entry(&mut history, VatRateEntry::new(dec!(0.14), date(2018, 1, 1))).unwrap();
        add_rate_entry(&mut history, VatRateEntry::new(dec!(0.16), date(2026, 4, 1))).unwrap();

        let dates: Vec<NaiveDate> = history.iter().map(|e| e.effective_date).collect();
        assert_eq!(dates, vec![date(2018, 1, 1), date(2025, 4, 1), date(2026, 4, 1)]);
    }

    #[test]
    fn add_rejects_duplicate_effective_date() {
        let mut history = sa_history();
        let err = add_rate_entry(&mut history, VatRateEntry::new(dec!(0.16), date(2025, 4, 1)))
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::DuplicateEffectiveDate { date } if date == self::date(2025, 4, 1)
        ));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn add_rejects_out_of_range_rates() {
        let mut history = Vec::new();
        assert!(add_rate_entry(&mut history, VatRateEntry::new(dec!(-0.01), date(2025, 1, 1))).is_err());
        assert!(add_rate_entry(&mut history, VatRateEntry::new(dec!(1.01), date(2025, 1, 1))).is_err());
        assert!(history.is_empty());

        // Zero-rating and a 100% rate are both representable.
        assert!(validate_rate(dec!(0)).is_ok());
        assert!(validate_rate(dec!(1)).is_ok());
    }

    #[test]
    fn vat_portion_rounds_half_up() {
        assert_eq!(vat_portion(dec!(1000), dec!(0.15)), dec!(150.00));
        assert_eq!(vat_portion(dec!(8.30), dec!(0.15)), dec!(1.25));
        assert_eq!(vat_portion(dec!(123.45), dec!(0.14)), dec!(17.28));
    }
}
