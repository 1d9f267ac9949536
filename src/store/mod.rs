//! Storage abstraction for settings rows and the audit ledger.
//!
//! The trait hands mutation logic to the store as closures so that a
//! backend can run them inside whatever atomicity it has: a mutex here,
//! a serializable transaction or compare-and-swap loop in a database
//! implementation. Counter movement and its audit record always commit
//! together or not at all.

mod memory;

pub use memory::InMemoryStore;

use chrono::{DateTime, Utc};

use crate::core::{
    AuditEntry, AuditRecord, DocumentType, NumberingError, NumberingSettings, StoreError, TenantId,
};

/// Mutation applied to a tenant's settings row. Receives the stored row,
/// or `None` for a tenant that has never written one.
pub type SettingsFn<'a> =
    &'a mut dyn FnMut(Option<NumberingSettings>) -> Result<NumberingSettings, NumberingError>;

/// Mutation applied for a sequential allocation: maps the stored row to
/// the advanced settings plus the ledger entry to file with them.
pub type AdvanceFn<'a> = &'a mut dyn FnMut(
    Option<NumberingSettings>,
) -> Result<(NumberingSettings, AuditEntry), NumberingError>;

/// Backend contract for numbering state.
///
/// Implementations call each closure at most once per invocation.
/// Optimistic backends signal interference with [`StoreError::Conflict`]
/// and leave retrying to the caller.
pub trait NumberingStore: Send + Sync {
    /// Read a tenant's settings row, if one has been written.
    fn load_settings(&self, tenant: &TenantId) -> Result<Option<NumberingSettings>, StoreError>;

    /// Atomically read-modify-write the settings row.
    fn update_settings(
        &self,
        tenant: &TenantId,
        apply: SettingsFn<'_>,
    ) -> Result<NumberingSettings, NumberingError>;

    /// Atomically advance a sequence and append its audit record.
    ///
    /// This is the increment-and-read boundary: two racing calls must
    /// never observe the same stored counter value. The store assigns
    /// the record's ordinal and enforces number uniqueness per tenant
    /// and document type ([`NumberingError::DuplicateNumber`]).
    fn commit_allocation(
        &self,
        tenant: &TenantId,
        advance: AdvanceFn<'_>,
    ) -> Result<AuditRecord, NumberingError>;

    /// Append a ledger record without touching settings (manual numbers).
    /// Enforces the same uniqueness constraint as [`Self::commit_allocation`].
    fn append_audit(
        &self,
        tenant: &TenantId,
        entry: AuditEntry,
    ) -> Result<AuditRecord, NumberingError>;

    /// Flip a record to voided, recording the reason and timestamp.
    fn mark_voided(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<AuditRecord, NumberingError>;

    /// Backfill the owning document's id onto an existing record.
    fn attach_document_id(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        document_id: &str,
    ) -> Result<(), NumberingError>;

    /// Look up a single record by number.
    fn find_audit(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
    ) -> Result<Option<AuditRecord>, StoreError>;

    /// All records for a tenant, in no particular order.
    fn scan_audit(&self, tenant: &TenantId) -> Result<Vec<AuditRecord>, StoreError>;
}
