//! Configure a VAT rate history and resolve rates for document dates.

use chrono::NaiveDate;
use nommer::{NumberingService, SettingsPatch, TenantId, VatRateEntry, vat_portion};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn main() {
    let service = NumberingService::in_memory();
    let tenant = TenantId::new("acme");

    // Register for VAT with a 14% base rate.
    service
        .update_settings(
            &tenant,
            SettingsPatch {
                vat_registered: Some(true),
                vat_number: Some("4123456789".to_owned()),
                vat_rate: Some(dec!(0.14)),
                ..Default::default()
            },
        )
        .unwrap();

    // The 2018 increase, plus a change scheduled for next budget year.
    service
        .add_future_vat_rate(
            &tenant,
            VatRateEntry::new(dec!(0.15), date(2018, 4, 1)).with_notes("Budget 2018"),
        )
        .unwrap();
    service
        .add_future_vat_rate(
            &tenant,
            VatRateEntry::new(dec!(0.155), date(2026, 4, 1)).with_notes("Budget 2026"),
        )
        .unwrap();

    for on in [date(2017, 6, 1), date(2020, 6, 1), date(2026, 6, 1)] {
        let rate = service.vat_rate_for_date(&tenant, on).unwrap();
        println!(
            "on {on}: rate {rate}, VAT on R1000.00 = R{}",
            vat_portion(dec!(1000), rate)
        );
    }
}
