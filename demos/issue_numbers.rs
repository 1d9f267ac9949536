//! Issue sequential invoice and credit note numbers for a tenant.

use nommer::{NumberingService, TenantId};

fn main() {
    let service = NumberingService::in_memory();
    let tenant = TenantId::new("acme");

    let preview = service.preview_invoice_number(&tenant).unwrap();
    println!("next invoice number will be: {preview}");

    for _ in 0..3 {
        let allocation = service.generate_invoice_number(&tenant).unwrap();
        println!(
            "issued {} (sequence {}, year {})",
            allocation.number, allocation.sequence, allocation.year
        );
    }

    let credit_note = service.generate_credit_note_number(&tenant).unwrap();
    println!("issued credit note {}", credit_note.number);

    // Link the number to the document the host application created.
    service
        .attach_document_id(
            &tenant,
            nommer::DocumentType::CreditNote,
            &credit_note.number,
            "doc-81",
        )
        .unwrap();

    let settings = service.settings(&tenant).unwrap();
    println!(
        "counters now: invoices {} / credit notes {}",
        settings.invoice_sequence_current, settings.credit_note_sequence_current
    );
}
