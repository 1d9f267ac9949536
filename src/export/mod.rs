//! Audit ledger export for compliance reporting.

mod csv;

pub use csv::audit_csv;
