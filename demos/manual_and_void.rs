//! Flexible-mode manual numbers and voiding.

use chrono::Utc;
use nommer::{DocumentType, NumberingMode, NumberingService, SettingsPatch, TenantId};

fn main() {
    let service = NumberingService::in_memory();
    let tenant = TenantId::new("acme");

    // Strict mode (the default) rejects manual numbers outright.
    let err = service
        .record_manual_number(
            &tenant,
            DocumentType::Invoice,
            "INV-2025-050",
            Utc::now().date_naive(),
        )
        .unwrap_err();
    println!("strict mode: {err} (code {})", err.code());

    service
        .update_settings(
            &tenant,
            SettingsPatch {
                numbering_mode: Some(NumberingMode::Flexible),
                allow_manual_numbers: Some(true),
                gap_tolerance_days: Some(7),
                ..Default::default()
            },
        )
        .unwrap();

    let manual = service
        .record_manual_number(
            &tenant,
            DocumentType::Invoice,
            "INV-2025-050",
            Utc::now().date_naive(),
        )
        .unwrap();
    println!(
        "recorded manual number {} (gap from expected: {:?})",
        manual.number, manual.gap_delta
    );

    // The sequence continues after the manual number, never colliding.
    let next = service.generate_invoice_number(&tenant).unwrap();
    println!("next sequential number: {}", next.number);

    // Voiding retires a number permanently; the counter stays put.
    let voided = service
        .void_number(&tenant, DocumentType::Invoice, &next.number, "issued in error")
        .unwrap();
    println!(
        "voided {} at {:?} with reason {:?}",
        voided.number, voided.voided_at, voided.void_reason
    );

    let after = service.generate_invoice_number(&tenant).unwrap();
    println!("sequence moves on to: {}", after.number);
}
