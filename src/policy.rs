//! Numbering mode policy and void coordination.
//!
//! Strict and flexible mode share the same issuance guarantee: every
//! allocated number ends up in the ledger as exactly one `Used` record,
//! later voidable with a reason. The modes differ only in whether a
//! caller may record a manually chosen number. Sequential issuance never
//! gaps by construction, so there is no blocking state to maintain.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::allocator::{SequenceAllocator, next_position};
use crate::core::{
    Allocation, AuditEntry, AuditRecord, DocumentType, NumberingError, NumberingMode,
    NumberingSettings, SequencePosition, TenantId,
};
use crate::ledger::AuditLedger;
use crate::store::NumberingStore;

/// Applies the tenant's numbering mode to issuance requests.
#[derive(Debug)]
pub struct GapPolicyEnforcer<'a, S> {
    store: &'a S,
}

impl<'a, S: NumberingStore> GapPolicyEnforcer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Issue the next sequential number. Permitted in every mode.
    pub fn issue_next(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        now: DateTime<Utc>,
    ) -> Result<Allocation, NumberingError> {
        SequenceAllocator::new(self.store).allocate_next(tenant, doc_type, now)
    }

    /// Record a manually chosen number.
    ///
    /// Requires flexible mode with `allow_manual_numbers`. The document
    /// date may lie at most `gap_tolerance_days` in the past. When the
    /// number parses under the tenant's template for the current year,
    /// its distance from the expected next value is stored as the gap
    /// annotation, and a number ahead of the counter pulls the counter
    /// forward so sequential issuance can never collide with it.
    pub fn record_manual(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        document_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<AuditRecord, NumberingError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(NumberingError::EmptyNumber { doc_type });
        }

        let year = now.date_naive().year();
        self.store.commit_allocation(tenant, &mut |row| {
            let mut settings = row.unwrap_or_else(|| NumberingSettings::defaults(year));
            check_manual_permitted(&settings)?;
            check_gap_tolerance(&settings, doc_type, number, document_date, now)?;

            let template = settings.template_for(doc_type)?;
            let mut entry = AuditEntry::manual(doc_type, number, now);

            // Out-of-template numbers are tolerated but carry no gap
            // annotation and cannot move the counter.
            if let Some(parts) = template.extract(number)
                && parts.year.is_none_or(|y| y == year)
            {
                let expected = next_position(&settings, doc_type, year)?;
                entry = entry.with_gap_delta(i64::from(parts.sequence) - i64::from(expected.current));
                if parts.sequence >= expected.current {
                    settings.set_sequence(
                        doc_type,
                        SequencePosition {
                            current: parts.sequence,
                            year: expected.year,
                        },
                    );
                }
            }
            Ok((settings, entry))
        })
    }
}

fn check_manual_permitted(settings: &NumberingSettings) -> Result<(), NumberingError> {
    if settings.numbering_mode == NumberingMode::Strict || !settings.allow_manual_numbers {
        return Err(NumberingError::ManualNotAllowed {
            mode: settings.numbering_mode,
        });
    }
    Ok(())
}

fn check_gap_tolerance(
    settings: &NumberingSettings,
    doc_type: DocumentType,
    number: &str,
    document_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(), NumberingError> {
    let days_back = (now.date_naive() - document_date).num_days();
    if days_back > i64::from(settings.gap_tolerance_days) {
        return Err(NumberingError::GapToleranceExceeded {
            doc_type,
            number: number.to_owned(),
            document_date,
            tolerance_days: settings.gap_tolerance_days,
        });
    }
    Ok(())
}

/// Top-level void operation.
///
/// Voiding retires a number permanently: the ledger record flips to
/// `Voided`, the sequence counters stay where they are, and the number is
/// never reissued (ledger uniqueness holds across statuses).
#[derive(Debug)]
pub struct VoidCoordinator<'a, S> {
    store: &'a S,
}

impl<'a, S: NumberingStore> VoidCoordinator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn void(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        number: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<AuditRecord, NumberingError> {
        AuditLedger::new(self.store).record_voided(tenant, doc_type, number, reason, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AuditStatus, NumberOrigin, SettingsPatch};
    use crate::store::InMemoryStore;
    use chrono::TimeZone;

    fn tenant() -> TenantId {
        TenantId::new("t1")
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
    }

    fn flexible_store(tolerance_days: u32) -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .update_settings(&tenant(), &mut |row| {
                let patch = SettingsPatch {
                    numbering_mode: Some(NumberingMode::Flexible),
                    allow_manual_numbers: Some(true),
                    gap_tolerance_days: Some(tolerance_days),
                    ..Default::default()
                };
                patch.apply_to(row.unwrap_or_else(|| NumberingSettings::defaults(2025)))
            })
            .unwrap();
        store
    }

    #[test]
    fn strict_mode_rejects_manual_numbers() {
        let store = InMemoryStore::new();
        let policy = GapPolicyEnforcer::new(&store);

        let err = policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-050",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::ManualNotAllowed {
                mode: NumberingMode::Strict
            }
        ));
        assert!(store.scan_audit(&tenant()).unwrap().is_empty());
    }

    #[test]
    fn flexible_mode_still_requires_the_allow_flag() {
        let store = InMemoryStore::new();
        store
            .update_settings(&tenant(), &mut |row| {
                let mut settings = row.unwrap_or_else(|| NumberingSettings::defaults(2025));
                settings.numbering_mode = NumberingMode::Flexible;
                Ok(settings)
            })
            .unwrap();

        let err = GapPolicyEnforcer::new(&store)
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-050",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap_err();
        assert!(matches!(err, NumberingError::ManualNotAllowed { .. }));
    }

    #[test]
    fn manual_number_ahead_of_counter_pulls_it_forward() {
        let store = flexible_store(0);
        let policy = GapPolicyEnforcer::new(&store);

        let record = policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-050",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap();
        assert_eq!(record.origin, NumberOrigin::Manual);
        assert_eq!(record.gap_delta, Some(49), "expected next was 1");
        assert_eq!(record.status, AuditStatus::Used);

        // The sequence continues after the manual number.
        let next = policy
            .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 2))
            .unwrap();
        assert_eq!(next.number, "INV-2025-051");
    }

    #[test]
    fn manual_number_behind_counter_leaves_it_alone() {
        let store = flexible_store(0);
        let policy = GapPolicyEnforcer::new(&store);
        for _ in 0..5 {
            policy
                .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 1))
                .unwrap();
        }

        // Parses to sequence 3 (wider padding keeps the string unique),
        // which is behind the counter at 5: annotated, counter untouched.
        let record = policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-0003",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap();
        assert_eq!(record.gap_delta, Some(-3), "expected next was 6");

        let next = policy
            .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 1))
            .unwrap();
        assert_eq!(next.number, "INV-2025-006");
    }

    #[test]
    fn gap_tolerance_is_enforced_against_the_document_date() {
        let store = flexible_store(7);
        let policy = GapPolicyEnforcer::new(&store);

        // 7 days back: allowed.
        policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-010",
                at(2025, 5, 25).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap();

        // 8 days back: rejected.
        let err = policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-011",
                at(2025, 5, 24).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::GapToleranceExceeded {
                tolerance_days: 7,
                ..
            }
        ));

        // Future-dated documents are not a gap.
        policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-012",
                at(2025, 6, 8).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap();
    }

    #[test]
    fn manual_number_at_the_counter_ceiling_does_not_break_issuance() {
        let store = flexible_store(0);
        let policy = GapPolicyEnforcer::new(&store);

        // Parses to u32::MAX under INV-YYYY-NNN and parks the counter there.
        let record = policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-4294967295",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap();
        assert_eq!(record.gap_delta, Some(i64::from(u32::MAX) - 1));

        // The next sequential allocation errors cleanly instead of wrapping
        // the counter back to zero.
        let err = policy
            .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::SequenceExhausted {
                doc_type: DocumentType::Invoice,
                year: 2025,
            }
        ));
        assert_eq!(
            store
                .load_settings(&tenant())
                .unwrap()
                .unwrap()
                .invoice_sequence_current,
            u32::MAX
        );

        // So does a second in-template manual number.
        let err = policy
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "INV-2025-777",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap_err();
        assert!(matches!(err, NumberingError::SequenceExhausted { .. }));
    }

    #[test]
    fn blank_manual_numbers_are_rejected() {
        let store = flexible_store(0);
        let err = GapPolicyEnforcer::new(&store)
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "   ",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            NumberingError::EmptyNumber {
                doc_type: DocumentType::Invoice
            }
        ));
    }

    #[test]
    fn off_template_manual_number_records_without_gap_annotation() {
        let store = flexible_store(0);
        let record = GapPolicyEnforcer::new(&store)
            .record_manual(
                &tenant(),
                DocumentType::Invoice,
                "LEGACY/77",
                at(2025, 6, 1).date_naive(),
                at(2025, 6, 1),
            )
            .unwrap();
        assert_eq!(record.gap_delta, None);

        // Counter untouched; the next sequential number is still 1.
        let next = GapPolicyEnforcer::new(&store)
            .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 1))
            .unwrap();
        assert_eq!(next.sequence, 1);
    }

    #[test]
    fn void_never_moves_the_counter_or_reissues() {
        let store = InMemoryStore::new();
        let policy = GapPolicyEnforcer::new(&store);
        let coordinator = VoidCoordinator::new(&store);

        let first = policy
            .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 1))
            .unwrap();
        let voided = coordinator
            .void(
                &tenant(),
                DocumentType::Invoice,
                &first.number,
                "duplicate charge",
                at(2025, 6, 2),
            )
            .unwrap();
        assert!(voided.is_voided());

        let err = coordinator
            .void(
                &tenant(),
                DocumentType::Invoice,
                &first.number,
                "again",
                at(2025, 6, 3),
            )
            .unwrap_err();
        assert!(matches!(err, NumberingError::AlreadyVoided { .. }));

        let next = policy
            .issue_next(&tenant(), DocumentType::Invoice, at(2025, 6, 3))
            .unwrap();
        assert_ne!(next.number, first.number);
        assert_eq!(next.sequence, 2);
    }
}
