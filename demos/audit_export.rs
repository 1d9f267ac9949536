//! Query the audit trail and export it as CSV.

use nommer::{AuditFilter, AuditStatus, DocumentType, NumberingService, TenantId};

fn main() {
    let service = NumberingService::in_memory();
    let tenant = TenantId::new("acme");

    for _ in 0..3 {
        service.generate_invoice_number(&tenant).unwrap();
    }
    let cn = service.generate_credit_note_number(&tenant).unwrap();
    service
        .void_number(&tenant, DocumentType::CreditNote, &cn.number, "wrong client")
        .unwrap();

    let voided = service
        .audit(
            &tenant,
            &AuditFilter {
                status: Some(AuditStatus::Voided),
                ..Default::default()
            },
        )
        .unwrap();
    println!("{} voided number(s) on file", voided.len());

    let csv = service.export_audit_csv(&tenant, None, None).unwrap();
    println!("{csv}");
}
