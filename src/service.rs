//! The external surface: one façade wiring allocator, policy, ledger,
//! and VAT resolution over a single [`NumberingStore`].

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::allocator::SequenceAllocator;
use crate::core::{
    Allocation, AuditFilter, AuditRecord, DocumentType, NumberingError, NumberingSettings,
    SettingsPatch, TenantId, VatRateEntry, add_rate_entry, resolve_rate,
};
use crate::ledger::AuditLedger;
use crate::policy::{GapPolicyEnforcer, VoidCoordinator};
use crate::store::{InMemoryStore, NumberingStore};

/// Time source. Injected so rollover, previews, and audit timestamps are
/// deterministic under test.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn system() -> Self {
        Clock::System
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Clock::Fixed(at)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Tenant-scoped numbering, voiding, audit, and VAT-rate operations.
///
/// Generic over the storage backend; every operation takes the tenant
/// explicitly, there is no ambient tenant context.
#[derive(Debug, Clone)]
pub struct NumberingService<S> {
    store: S,
    clock: Clock,
}

impl NumberingService<InMemoryStore> {
    /// Service over the bundled in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}

impl<S: NumberingStore> NumberingService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Clock::system())
    }

    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The tenant's settings, or defaults if none were ever written.
    /// A read never persists the defaults.
    pub fn settings(&self, tenant: &TenantId) -> Result<NumberingSettings, NumberingError> {
        Ok(self
            .store
            .load_settings(tenant)?
            .unwrap_or_else(|| NumberingSettings::defaults(self.clock.today().year())))
    }

    /// Merge a partial update onto the stored settings and persist the
    /// validated result. Sequence counters are not patchable.
    pub fn update_settings(
        &self,
        tenant: &TenantId,
        patch: SettingsPatch,
    ) -> Result<NumberingSettings, NumberingError> {
        let year = self.clock.today().year();
        self.store.update_settings(tenant, &mut |row| {
            patch.apply_to(row.unwrap_or_else(|| NumberingSettings::defaults(year)))
        })
    }

    pub fn preview_invoice_number(&self, tenant: &TenantId) -> Result<String, NumberingError> {
        self.preview_number(tenant, DocumentType::Invoice)
    }

    pub fn preview_credit_note_number(&self, tenant: &TenantId) -> Result<String, NumberingError> {
        self.preview_number(tenant, DocumentType::CreditNote)
    }

    /// What the next allocation would return, without writing anything.
    pub fn preview_number(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
    ) -> Result<String, NumberingError> {
        SequenceAllocator::new(&self.store).preview_next(tenant, doc_type, self.clock.today())
    }

    pub fn generate_invoice_number(&self, tenant: &TenantId) -> Result<Allocation, NumberingError> {
        self.generate_number(tenant, DocumentType::Invoice)
    }

    pub fn generate_credit_note_number(
        &self,
        tenant: &TenantId,
    ) -> Result<Allocation, NumberingError> {
        self.generate_number(tenant, DocumentType::CreditNote)
    }

    /// Atomically claim the next number and file its `Used` audit record.
    pub fn generate_number(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
    ) -> Result<Allocation, NumberingError> {
        GapPolicyEnforcer::new(&self.store).issue_next(tenant, doc_type, self.clock.now())
    }

    /// Record a manually chosen number, subject to the tenant's mode,
    /// manual-number flag, and gap tolerance.
    pub fn record_manual_number(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        document_date: NaiveDate,
    ) -> Result<AuditRecord, NumberingError> {
        GapPolicyEnforcer::new(&self.store).record_manual(
            tenant,
            doc_type,
            number,
            document_date,
            self.clock.now(),
        )
    }

    /// Permanently retire a number. The counter never rewinds and the
    /// number is never reissued.
    pub fn void_number(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        reason: &str,
    ) -> Result<AuditRecord, NumberingError> {
        VoidCoordinator::new(&self.store).void(tenant, doc_type, number, reason, self.clock.now())
    }

    /// Backfill the owning document's id onto an audit record.
    ///
    /// Best-effort by contract: the numbering operation this follows has
    /// already succeeded, so a failure here is logged and swallowed
    /// rather than surfaced to the user.
    pub fn attach_document_id(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        document_id: &str,
    ) -> Result<(), NumberingError> {
        if let Err(error) =
            AuditLedger::new(&self.store).attach_document_id(tenant, doc_type, number, document_id)
        {
            tracing::warn!(
                %tenant,
                %doc_type,
                number,
                document_id,
                %error,
                "failed to attach document id to audit record"
            );
        }
        Ok(())
    }

    /// Filtered audit history, newest first.
    pub fn audit(
        &self,
        tenant: &TenantId,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditRecord>, NumberingError> {
        AuditLedger::new(&self.store).query(tenant, filter)
    }

    /// The VAT rate in force on `date` under the tenant's rate history.
    pub fn vat_rate_for_date(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
    ) -> Result<Decimal, NumberingError> {
        let settings = self.settings(tenant)?;
        Ok(resolve_rate(
            &settings.vat_rate_history,
            settings.vat_rate,
            date,
        ))
    }

    /// Schedule a rate change (future- or past-dated) in the tenant's
    /// rate history.
    pub fn add_future_vat_rate(
        &self,
        tenant: &TenantId,
        entry: VatRateEntry,
    ) -> Result<NumberingSettings, NumberingError> {
        let year = self.clock.today().year();
        self.store.update_settings(tenant, &mut |row| {
            let mut settings = row.unwrap_or_else(|| NumberingSettings::defaults(year));
            add_rate_entry(&mut settings.vat_rate_history, entry.clone())?;
            Ok(settings)
        })
    }

    /// Render the range-filtered audit ledger as CSV (newest first).
    #[cfg(feature = "export")]
    pub fn export_audit_csv(
        &self,
        tenant: &TenantId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<String, NumberingError> {
        let records = self.audit(
            tenant,
            &AuditFilter {
                from,
                to,
                ..Default::default()
            },
        )?;
        Ok(crate::export::audit_csv(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_is_deterministic() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let clock = Clock::fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.today(), at.date_naive());
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = Clock::system();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
