//! Sequential number allocation with lazy year rollover.
//!
//! [`SequenceAllocator`] is the only component that moves the sequence
//! counters. The counter bump and its audit record commit together
//! through [`NumberingStore::commit_allocation`], so two racing callers
//! can never observe the same counter value; backends that signal
//! optimistic interference with [`StoreError::Conflict`] are retried a
//! bounded number of times.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::core::{
    Allocation, AuditEntry, DocumentType, NumberingError, NumberingSettings, SequencePosition,
    StoreError, TenantId,
};
use crate::store::NumberingStore;

/// Retry budget for [`StoreError::Conflict`] before giving up with
/// [`NumberingError::AllocationConflict`].
const MAX_ATTEMPTS: u32 = 3;

/// Issues the next number for a tenant and document type.
#[derive(Debug)]
pub struct SequenceAllocator<'a, S> {
    store: &'a S,
}

impl<'a, S: NumberingStore> SequenceAllocator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Render the number the next allocation would return, without
    /// touching any state. Repeated previews return the same number,
    /// and an allocation immediately after returns exactly it.
    pub fn preview_next(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        today: NaiveDate,
    ) -> Result<String, NumberingError> {
        let year = today.year();
        let settings = self
            .store
            .load_settings(tenant)?
            .unwrap_or_else(|| NumberingSettings::defaults(year));
        let template = settings.template_for(doc_type)?;
        let next = next_position(&settings, doc_type, year)?;
        Ok(template.render(year, next.current))
    }

    /// Durably claim the next number.
    ///
    /// Rollover is lazy: the first allocation whose calendar year differs
    /// from the stored sequence year (with `year_reset_enabled`) restarts
    /// the sequence at 1 and refiles it under the new year. With the flag
    /// off the counter climbs indefinitely and the stored year stays put;
    /// the rendered number always carries the issue year either way.
    pub fn allocate_next(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        now: DateTime<Utc>,
    ) -> Result<Allocation, NumberingError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.try_allocate(tenant, doc_type, now) {
                Err(NumberingError::Store(StoreError::Conflict)) if attempts < MAX_ATTEMPTS => {
                    continue;
                }
                Err(NumberingError::Store(StoreError::Conflict)) => {
                    return Err(NumberingError::AllocationConflict { doc_type, attempts });
                }
                other => return other,
            }
        }
    }

    fn try_allocate(
        &self,
        tenant: &TenantId,
        doc_type: DocumentType,
        now: DateTime<Utc>,
    ) -> Result<Allocation, NumberingError> {
        let year = now.date_naive().year();
        let mut committed: Option<SequencePosition> = None;

        let record = self.store.commit_allocation(tenant, &mut |row| {
            let mut settings = row.unwrap_or_else(|| NumberingSettings::defaults(year));
            let template = settings.template_for(doc_type)?;
            let next = next_position(&settings, doc_type, year)?;
            settings.set_sequence(doc_type, next);
            committed = Some(next);
            let number = template.render(year, next.current);
            Ok((settings, AuditEntry::sequential(doc_type, number, now)))
        })?;

        let position = committed.ok_or_else(|| {
            StoreError::Corrupt("commit_allocation returned without running the closure".into())
        })?;
        Ok(Allocation {
            number: record.number.clone(),
            sequence: position.current,
            year: position.year,
            record,
        })
    }
}

/// Where the sequence lands on its next allocation in `year`.
///
/// Fails with [`NumberingError::SequenceExhausted`] when the counter has
/// no next value (a manual number can park it at `u32::MAX`).
pub(crate) fn next_position(
    settings: &NumberingSettings,
    doc_type: DocumentType,
    year: i32,
) -> Result<SequencePosition, NumberingError> {
    let stored = settings.sequence_for(doc_type);
    if settings.year_reset_enabled && stored.year != year {
        return Ok(SequencePosition { current: 1, year });
    }
    let current = stored
        .current
        .checked_add(1)
        .ok_or(NumberingError::SequenceExhausted {
            doc_type,
            year: stored.year,
        })?;
    Ok(SequencePosition {
        current,
        year: stored.year,
    })
}
