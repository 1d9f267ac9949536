//! Suggested number format templates.
//!
//! Hosts typically offer these in a settings screen instead of asking
//! users to write template syntax by hand. Any template accepted by
//! [`NumberTemplate::parse`](super::format::NumberTemplate::parse) works;
//! these are merely the common shapes.

use super::types::DocumentType;

/// A suggested number template with a rendered example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPreset {
    pub label: &'static str,
    pub format: &'static str,
    /// The template rendered for year 2025, sequence 1.
    pub example: &'static str,
    pub description: &'static str,
}

/// Suggested invoice number templates.
pub static INVOICE_FORMAT_PRESETS: &[FormatPreset] = &[
    FormatPreset {
        label: "INV-YYYY-NNN",
        format: "INV-YYYY-NNN",
        example: "INV-2025-001",
        description: "Invoice with year and 3-digit sequence",
    },
    FormatPreset {
        label: "INV-YYYY-NNNN",
        format: "INV-YYYY-NNNN",
        example: "INV-2025-0001",
        description: "Invoice with year and 4-digit sequence",
    },
    FormatPreset {
        label: "INV-YY-NNN",
        format: "INV-YY-NNN",
        example: "INV-25-001",
        description: "Invoice with 2-digit year and 3-digit sequence",
    },
    FormatPreset {
        label: "YYYY-NNN",
        format: "YYYY-NNN",
        example: "2025-001",
        description: "Year and 3-digit sequence only",
    },
    FormatPreset {
        label: "INV-NNN",
        format: "INV-NNN",
        example: "INV-001",
        description: "Simple invoice with 3-digit sequence (no year reset)",
    },
];

/// Suggested credit note number templates.
pub static CREDIT_NOTE_FORMAT_PRESETS: &[FormatPreset] = &[
    FormatPreset {
        label: "CN-YYYY-NNN",
        format: "CN-YYYY-NNN",
        example: "CN-2025-001",
        description: "Credit note with year and 3-digit sequence",
    },
    FormatPreset {
        label: "CN-YYYY-NNNN",
        format: "CN-YYYY-NNNN",
        example: "CN-2025-0001",
        description: "Credit note with year and 4-digit sequence",
    },
    FormatPreset {
        label: "CN-YY-NNN",
        format: "CN-YY-NNN",
        example: "CN-25-001",
        description: "Credit note with 2-digit year and 3-digit sequence",
    },
    FormatPreset {
        label: "CR-YYYY-NNN",
        format: "CR-YYYY-NNN",
        example: "CR-2025-001",
        description: "Credit with year and 3-digit sequence",
    },
];

/// The preset list for one document type.
pub fn format_presets(doc_type: DocumentType) -> &'static [FormatPreset] {
    match doc_type {
        DocumentType::Invoice => INVOICE_FORMAT_PRESETS,
        DocumentType::CreditNote => CREDIT_NOTE_FORMAT_PRESETS,
    }
}
