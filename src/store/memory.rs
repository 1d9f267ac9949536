use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::core::{
    AuditEntry, AuditRecord, DocumentType, NumberingError, NumberingSettings, StoreError, TenantId,
};

use super::{AdvanceFn, NumberingStore, SettingsFn};

#[derive(Debug, Default)]
struct TenantState {
    settings: Option<NumberingSettings>,
    ledger: Vec<AuditRecord>,
    ordinals: HashMap<DocumentType, u64>,
}

impl TenantState {
    fn next_ordinal(&mut self, doc_type: DocumentType) -> u64 {
        let slot = self.ordinals.entry(doc_type).or_insert(0);
        *slot += 1;
        *slot
    }

    fn find_mut(&mut self, doc_type: DocumentType, number: &str) -> Option<&mut AuditRecord> {
        self.ledger
            .iter_mut()
            .find(|r| r.doc_type == doc_type && r.number == number)
    }

    fn number_exists(&self, doc_type: DocumentType, number: &str) -> bool {
        self.ledger
            .iter()
            .any(|r| r.doc_type == doc_type && r.number == number)
    }
}

/// The bundled in-memory backend.
///
/// Clones share state, so a handle can be passed around like a pooled
/// database connection. Every operation runs under one mutex, which makes
/// all trait operations linearizable; `commit_allocation` therefore never
/// reports [`StoreError::Conflict`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<HashMap<TenantId, TenantState>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TenantId, TenantState>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NumberingStore for InMemoryStore {
    fn load_settings(&self, tenant: &TenantId) -> Result<Option<NumberingSettings>, StoreError> {
        Ok(self.lock().get(tenant).and_then(|s| s.settings.clone()))
    }

    fn update_settings(
        &self,
        tenant: &TenantId,
        apply: SettingsFn<'_>,
    ) -> Result<NumberingSettings, NumberingError> {
        let mut map = self.lock();
        let state = map.entry(tenant.clone()).or_default();
        let updated = apply(state.settings.clone())?;
        state.settings = Some(updated.clone());
        Ok(updated)
    }

    fn commit_allocation(
        &self,
        tenant: &TenantId,
        advance: AdvanceFn<'_>,
    ) -> Result<AuditRecord, NumberingError> {
        let mut map = self.lock();
        let state = map.entry(tenant.clone()).or_default();
        let (settings, entry) = advance(state.settings.clone())?;
        if state.number_exists(entry.doc_type, &entry.number) {
            return Err(NumberingError::DuplicateNumber {
                doc_type: entry.doc_type,
                number: entry.number,
            });
        }
        let ordinal = state.next_ordinal(entry.doc_type);
        let record = entry.into_record(ordinal);
        state.ledger.push(record.clone());
        state.settings = Some(settings);
        Ok(record)
    }

    fn append_audit(
        &self,
        tenant: &TenantId,
        entry: AuditEntry,
    ) -> Result<AuditRecord, NumberingError> {
        let mut map = self.lock();
        let state = map.entry(tenant.clone()).or_default();
        if state.number_exists(entry.doc_type, &entry.number) {
            return Err(NumberingError::DuplicateNumber {
                doc_type: entry.doc_type,
                number: entry.number,
            });
        }
        let ordinal = state.next_ordinal(entry.doc_type);
        let record = entry.into_record(ordinal);
        state.ledger.push(record.clone());
        Ok(record)
    }

    fn mark_voided(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<AuditRecord, NumberingError> {
        let mut map = self.lock();
        let record = map
            .get_mut(tenant)
            .and_then(|state| state.find_mut(doc_type, number))
            .ok_or_else(|| NumberingError::NumberNotFound {
                doc_type,
                number: number.to_owned(),
            })?;
        if record.is_voided() {
            return Err(NumberingError::AlreadyVoided {
                doc_type,
                number: number.to_owned(),
            });
        }
        record.status = crate::core::AuditStatus::Voided;
        record.void_reason = Some(reason.to_owned());
        record.voided_at = Some(at);
        Ok(record.clone())
    }

    fn attach_document_id(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        document_id: &str,
    ) -> Result<(), NumberingError> {
        let mut map = self.lock();
        let record = map
            .get_mut(tenant)
            .and_then(|state| state.find_mut(doc_type, number))
            .ok_or_else(|| NumberingError::NumberNotFound {
                doc_type,
                number: number.to_owned(),
            })?;
        record.document_id = Some(document_id.to_owned());
        Ok(())
    }

    fn find_audit(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
    ) -> Result<Option<AuditRecord>, StoreError> {
        Ok(self.lock().get(tenant).and_then(|state| {
            state
                .ledger
                .iter()
                .find(|r| r.doc_type == doc_type && r.number == number)
                .cloned()
        }))
    }

    fn scan_audit(&self, tenant: &TenantId) -> Result<Vec<AuditRecord>, StoreError> {
        Ok(self
            .lock()
            .get(tenant)
            .map(|state| state.ledger.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AuditStatus;
    use chrono::TimeZone;

    fn tenant() -> TenantId {
        TenantId::new("t1")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn ordinals_are_per_document_type() {
        let store = InMemoryStore::new();
        let inv1 = store
            .append_audit(
                &tenant(),
                AuditEntry::sequential(DocumentType::Invoice, "INV-001", now()),
            )
            .unwrap();
        let cn1 = store
            .append_audit(
                &tenant(),
                AuditEntry::sequential(DocumentType::CreditNote, "CN-001", now()),
            )
            .unwrap();
        let inv2 = store
            .append_audit(
                &tenant(),
                AuditEntry::sequential(DocumentType::Invoice, "INV-002", now()),
            )
            .unwrap();

        assert_eq!(inv1.ordinal, 1);
        assert_eq!(cn1.ordinal, 1);
        assert_eq!(inv2.ordinal, 2);
    }

    #[test]
    fn duplicate_numbers_are_rejected_per_type() {
        let store = InMemoryStore::new();
        store
            .append_audit(
                &tenant(),
                AuditEntry::sequential(DocumentType::Invoice, "2025-001", now()),
            )
            .unwrap();

        // Same number under the other document type is a different key.
        store
            .append_audit(
                &tenant(),
                AuditEntry::sequential(DocumentType::CreditNote, "2025-001", now()),
            )
            .unwrap();

        let err = store
            .append_audit(
                &tenant(),
                AuditEntry::manual(DocumentType::Invoice, "2025-001", now()),
            )
            .unwrap_err();
        assert!(matches!(err, NumberingError::DuplicateNumber { .. }));
    }

    #[test]
    fn void_then_void_again_fails() {
        let store = InMemoryStore::new();
        store
            .append_audit(
                &tenant(),
                AuditEntry::sequential(DocumentType::Invoice, "INV-001", now()),
            )
            .unwrap();

        let voided = store
            .mark_voided(&tenant(), DocumentType::Invoice, "INV-001", "typo", now())
            .unwrap();
        assert_eq!(voided.status, AuditStatus::Voided);
        assert_eq!(voided.void_reason.as_deref(), Some("typo"));

        let err = store
            .mark_voided(&tenant(), DocumentType::Invoice, "INV-001", "again", now())
            .unwrap_err();
        assert!(matches!(err, NumberingError::AlreadyVoided { .. }));
    }

    #[test]
    fn failed_advance_leaves_no_trace() {
        let store = InMemoryStore::new();
        let result = store.commit_allocation(&tenant(), &mut |_| {
            Err(NumberingError::MissingReason)
        });
        assert!(result.is_err());
        assert_eq!(store.load_settings(&tenant()).unwrap(), None);
        assert!(store.scan_audit(&tenant()).unwrap().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let store = InMemoryStore::new();
        let other = store.clone();
        store
            .update_settings(&tenant(), &mut |row| {
                Ok(row.unwrap_or_else(|| NumberingSettings::defaults(2025)))
            })
            .unwrap();
        assert!(other.load_settings(&tenant()).unwrap().is_some());
    }

    #[test]
    fn tenants_are_isolated() {
        let store = InMemoryStore::new();
        store
            .append_audit(
                &TenantId::new("a"),
                AuditEntry::sequential(DocumentType::Invoice, "INV-001", now()),
            )
            .unwrap();
        assert!(store.scan_audit(&TenantId::new("b")).unwrap().is_empty());
        assert!(
            store
                .find_audit(&TenantId::new("b"), DocumentType::Invoice, "INV-001")
                .unwrap()
                .is_none()
        );
    }
}
