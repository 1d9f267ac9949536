//! CSV rendering of audit records.
//!
//! Columns: `Number,Type,Status,CreatedAt,DocumentId,VoidReason`. The
//! header row is unquoted; every data cell is double-quoted with embedded
//! quotes doubled, so the file survives reasons containing commas or
//! quotes. Timestamps are RFC 3339 in UTC. Rows are joined with `\n` and
//! the output carries no trailing newline.

use chrono::SecondsFormat;

use crate::core::AuditRecord;

const HEADER: &str = "Number,Type,Status,CreatedAt,DocumentId,VoidReason";

/// Render records as CSV, one row per record, in the order given.
pub fn audit_csv(records: &[AuditRecord]) -> String {
    let mut out = String::from(HEADER);
    for record in records {
        out.push('\n');
        csv_field(&mut out, &record.number);
        out.push(',');
        csv_field(&mut out, record.doc_type.code());
        out.push(',');
        csv_field(&mut out, record.status.code());
        out.push(',');
        csv_field(
            &mut out,
            &record
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        out.push(',');
        csv_field(&mut out, record.document_id.as_deref().unwrap_or(""));
        out.push(',');
        csv_field(&mut out, record.void_reason.as_deref().unwrap_or(""));
    }
    out
}

fn csv_field(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}
