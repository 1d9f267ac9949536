//! Append-only audit ledger over a [`NumberingStore`].
//!
//! Every issued number lands here exactly once, as a `Used` record; the
//! only permitted transitions afterwards are the one-way flip to `Voided`
//! and the document-id backfill. Records are never deleted.

use chrono::{DateTime, Utc};

use crate::core::{AuditEntry, AuditFilter, AuditRecord, DocumentType, NumberingError, TenantId};
use crate::store::NumberingStore;

#[derive(Debug)]
pub struct AuditLedger<'a, S> {
    store: &'a S,
}

impl<'a, S: NumberingStore> AuditLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a `Used` record. The store enforces number uniqueness per
    /// tenant and document type ([`NumberingError::DuplicateNumber`]).
    pub fn record_used(
        &self,
        tenant: &TenantId,
        entry: AuditEntry,
    ) -> Result<AuditRecord, NumberingError> {
        self.store.append_audit(tenant, entry)
    }

    /// Flip an existing record to `Voided`, stamping the reason and time.
    pub fn record_voided(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<AuditRecord, NumberingError> {
        if reason.trim().is_empty() {
            return Err(NumberingError::MissingReason);
        }
        self.store
            .mark_voided(tenant, doc_type, number, reason.trim(), at)
    }

    /// Backfill the owning document's id. Errors propagate here; the
    /// service layer decides that the operation is best-effort.
    pub fn attach_document_id(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        document_id: &str,
    ) -> Result<(), NumberingError> {
        self.store
            .attach_document_id(tenant, doc_type, number, document_id)
    }

    /// Look up a single record by number.
    pub fn find(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
    ) -> Result<Option<AuditRecord>, NumberingError> {
        Ok(self.store.find_audit(tenant, doc_type, number)?)
    }

    /// Filtered history, newest first. Ties on `created_at` fall back to
    /// the store-assigned ordinal, which is the authoritative issuance
    /// order within a document type.
    pub fn query(
        &self,
        tenant: &TenantId,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditRecord>, NumberingError> {
        let mut records: Vec<AuditRecord> = self
            .store
            .scan_audit(tenant)?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.ordinal.cmp(&a.ordinal))
        });
        Ok(records)
    }
}
