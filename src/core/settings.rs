use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::NumberingError;
use super::format::NumberTemplate;
use super::types::{DocumentType, NumberingMode};
use super::vat::{self, VatRateEntry};

/// Default invoice number template.
pub const DEFAULT_INVOICE_FORMAT: &str = "INV-YYYY-NNN";
/// Default credit note template.
pub const DEFAULT_CREDIT_NOTE_FORMAT: &str = "CN-YYYY-NNN";
/// Default base VAT rate (15%, the South African standard rate).
pub const DEFAULT_VAT_RATE: Decimal = dec!(0.15);
/// Upper bound for [`NumberingSettings::gap_tolerance_days`].
pub const MAX_GAP_TOLERANCE_DAYS: u32 = 365;

/// Per-tenant numbering and VAT configuration.
///
/// Sequence counters hold the last issued value; the next allocation is
/// `current + 1`. Counters and their years move only through allocation
/// (or manual-number reconciliation), never through a settings update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingSettings {
    /// Invoice number template, e.g. `INV-YYYY-NNN`.
    pub invoice_format: String,
    /// Last issued invoice sequence value.
    pub invoice_sequence_current: u32,
    /// Year the invoice sequence is filed under.
    pub invoice_sequence_year: i32,
    /// Credit note number template, e.g. `CN-YYYY-NNN`.
    pub credit_note_format: String,
    /// Last issued credit note sequence value.
    pub credit_note_sequence_current: u32,
    /// Year the credit note sequence is filed under.
    pub credit_note_sequence_year: i32,
    /// Strict forbids manual numbers; flexible allows them.
    pub numbering_mode: NumberingMode,
    /// Restart sequences at 1 in a new calendar year.
    pub year_reset_enabled: bool,
    /// How far back a manual document may be dated, in days.
    pub gap_tolerance_days: u32,
    /// Whether manual numbers may be recorded at all.
    pub allow_manual_numbers: bool,
    /// Whether the tenant is VAT registered.
    pub vat_registered: bool,
    /// VAT registration number; required while registered.
    pub vat_number: Option<String>,
    /// Base VAT rate, used before any history entry applies.
    pub vat_rate: Decimal,
    /// Dated rate changes, sorted ascending by effective date.
    pub vat_rate_history: Vec<VatRateEntry>,
}

/// A sequence counter position for one document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencePosition {
    pub current: u32,
    pub year: i32,
}

impl NumberingSettings {
    /// Fresh settings for a tenant, with sequences filed under `year`.
    pub fn defaults(year: i32) -> Self {
        Self {
            invoice_format: DEFAULT_INVOICE_FORMAT.to_owned(),
            invoice_sequence_current: 0,
            invoice_sequence_year: year,
            credit_note_format: DEFAULT_CREDIT_NOTE_FORMAT.to_owned(),
            credit_note_sequence_current: 0,
            credit_note_sequence_year: year,
            numbering_mode: NumberingMode::Strict,
            year_reset_enabled: true,
            gap_tolerance_days: 0,
            allow_manual_numbers: false,
            vat_registered: false,
            vat_number: None,
            vat_rate: DEFAULT_VAT_RATE,
            vat_rate_history: Vec::new(),
        }
    }

    /// The number template string for one document type.
    pub fn format_for(&self, doc_type: DocumentType) -> &str {
        match doc_type {
            DocumentType::Invoice => &self.invoice_format,
            DocumentType::CreditNote => &self.credit_note_format,
        }
    }

    /// Parse the template for one document type.
    pub fn template_for(&self, doc_type: DocumentType) -> Result<NumberTemplate, NumberingError> {
        NumberTemplate::parse(self.format_for(doc_type))
    }

    /// The sequence counter position for one document type.
    pub fn sequence_for(&self, doc_type: DocumentType) -> SequencePosition {
        match doc_type {
            DocumentType::Invoice => SequencePosition {
                current: self.invoice_sequence_current,
                year: self.invoice_sequence_year,
            },
            DocumentType::CreditNote => SequencePosition {
                current: self.credit_note_sequence_current,
                year: self.credit_note_sequence_year,
            },
        }
    }

    pub(crate) fn set_sequence(&mut self, doc_type: DocumentType, position: SequencePosition) {
        match doc_type {
            DocumentType::Invoice => {
                self.invoice_sequence_current = position.current;
                self.invoice_sequence_year = position.year;
            }
            DocumentType::CreditNote => {
                self.credit_note_sequence_current = position.current;
                self.credit_note_sequence_year = position.year;
            }
        }
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), NumberingError> {
        NumberTemplate::parse(&self.invoice_format)?;
        NumberTemplate::parse(&self.credit_note_format)?;

        if self.gap_tolerance_days > MAX_GAP_TOLERANCE_DAYS {
            return Err(NumberingError::InvalidTolerance {
                days: self.gap_tolerance_days,
            });
        }

        if self.vat_registered
            && self
                .vat_number
                .as_deref()
                .is_none_or(|number| number.trim().is_empty())
        {
            return Err(NumberingError::MissingVatNumber);
        }

        vat::validate_rate(self.vat_rate)?;
        for entry in &self.vat_rate_history {
            vat::validate_rate(entry.rate)?;
        }
        for (i, entry) in self.vat_rate_history.iter().enumerate() {
            if self.vat_rate_history[..i]
                .iter()
                .any(|other| other.effective_date == entry.effective_date)
            {
                return Err(NumberingError::DuplicateEffectiveDate {
                    date: entry.effective_date,
                });
            }
        }
        Ok(())
    }
}

/// Partial settings update. `None` fields keep their stored value.
///
/// Sequence counters are deliberately absent: they move only through
/// allocation, so a settings write can never rewind a sequence. The rate
/// history is likewise managed through its own operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub invoice_format: Option<String>,
    pub credit_note_format: Option<String>,
    pub numbering_mode: Option<NumberingMode>,
    pub year_reset_enabled: Option<bool>,
    pub gap_tolerance_days: Option<u32>,
    pub allow_manual_numbers: Option<bool>,
    pub vat_registered: Option<bool>,
    /// Replaces the stored VAT number; omit to leave it unchanged.
    pub vat_number: Option<String>,
    pub vat_rate: Option<Decimal>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto existing settings and validate the result.
    pub fn apply_to(
        &self,
        mut settings: NumberingSettings,
    ) -> Result<NumberingSettings, NumberingError> {
        if let Some(format) = &self.invoice_format {
            settings.invoice_format = format.clone();
        }
        if let Some(format) = &self.credit_note_format {
            settings.credit_note_format = format.clone();
        }
        if let Some(mode) = self.numbering_mode {
            settings.numbering_mode = mode;
        }
        if let Some(enabled) = self.year_reset_enabled {
            settings.year_reset_enabled = enabled;
        }
        if let Some(days) = self.gap_tolerance_days {
            settings.gap_tolerance_days = days;
        }
        if let Some(allowed) = self.allow_manual_numbers {
            settings.allow_manual_numbers = allowed;
        }
        if let Some(registered) = self.vat_registered {
            settings.vat_registered = registered;
        }
        if let Some(number) = &self.vat_number {
            settings.vat_number = Some(number.clone());
        }
        if let Some(rate) = self.vat_rate {
            settings.vat_rate = rate;
        }
        settings.validate()?;
        Ok(settings)
    }
}
