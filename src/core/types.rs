use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque tenant identifier. The host application decides what goes in
/// here (a user UUID, an account slug); the library only ever compares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The two document kinds that draw numbers from independent sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    CreditNote,
}

impl DocumentType {
    /// Stable storage code for this document type.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::CreditNote => "credit_note",
        }
    }

    /// Parse a storage code back to a document type.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "invoice" => Some(DocumentType::Invoice),
            "credit_note" => Some(DocumentType::CreditNote),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Invoice => f.write_str("invoice"),
            DocumentType::CreditNote => f.write_str("credit note"),
        }
    }
}

/// How strictly the tenant controls its number sequence.
///
/// `Strict` permits sequential issuance only. `Flexible` additionally
/// allows manual numbers to be recorded, subject to the configured gap
/// tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingMode {
    Strict,
    Flexible,
}

impl NumberingMode {
    pub fn code(&self) -> &'static str {
        match self {
            NumberingMode::Strict => "strict",
            NumberingMode::Flexible => "flexible",
        }
    }
}

impl std::fmt::Display for NumberingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Lifecycle state of an issued number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Used,
    Voided,
}

impl AuditStatus {
    pub fn code(&self) -> &'static str {
        match self {
            AuditStatus::Used => "used",
            AuditStatus::Voided => "voided",
        }
    }
}

/// Whether a number came out of the sequence or was supplied by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberOrigin {
    Sequential,
    Manual,
}

/// A number issuance submitted to the ledger. The store assigns the
/// ordinal and turns this into an [`AuditRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub doc_type: DocumentType,
    pub number: String,
    pub origin: NumberOrigin,
    pub created_at: DateTime<Utc>,
    /// Manual numbers only: distance from the would-be-next sequence
    /// value (`supplied - expected`, so 0 means the manual number landed
    /// exactly where the sequence would have).
    pub gap_delta: Option<i64>,
}

impl AuditEntry {
    /// Entry for a number drawn from the tenant's sequence.
    pub fn sequential(
        doc_type: DocumentType,
        number: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            doc_type,
            number: number.into(),
            origin: NumberOrigin::Sequential,
            created_at,
            gap_delta: None,
        }
    }

    /// Entry for a manually supplied number.
    pub fn manual(
        doc_type: DocumentType,
        number: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            doc_type,
            number: number.into(),
            origin: NumberOrigin::Manual,
            created_at,
            gap_delta: None,
        }
    }

    /// Annotate a manual entry with its distance from the expected next
    /// sequence value.
    pub fn with_gap_delta(mut self, delta: i64) -> Self {
        self.gap_delta = Some(delta);
        self
    }

    /// Promote the entry to a stored record under the given ordinal.
    /// Records always start out as [`AuditStatus::Used`].
    pub fn into_record(self, ordinal: u64) -> AuditRecord {
        AuditRecord {
            ordinal,
            doc_type: self.doc_type,
            number: self.number,
            origin: self.origin,
            status: AuditStatus::Used,
            created_at: self.created_at,
            gap_delta: self.gap_delta,
            document_id: None,
            void_reason: None,
            voided_at: None,
        }
    }
}

/// One row of the append-only audit ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Store-assigned position, strictly monotonic per tenant and document
    /// type. The authoritative issuance order even when wall-clock
    /// timestamps collide.
    pub ordinal: u64,
    pub doc_type: DocumentType,
    /// The formatted document number, unique per tenant and document type.
    pub number: String,
    pub origin: NumberOrigin,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
    /// Manual numbers only: distance from the expected next sequence value.
    pub gap_delta: Option<i64>,
    /// Identifier of the owning document, backfilled after creation.
    pub document_id: Option<String>,
    pub void_reason: Option<String>,
    pub voided_at: Option<DateTime<Utc>>,
}

impl AuditRecord {
    pub fn is_voided(&self) -> bool {
        self.status == AuditStatus::Voided
    }
}

/// Filter for audit queries. All criteria are optional and combined
/// with AND; timestamp bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub doc_type: Option<DocumentType>,
    pub status: Option<AuditStatus>,
}

impl AuditFilter {
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(from) = self.from
            && record.created_at < from
        {
            return false;
        }
        if let Some(to) = self.to
            && record.created_at > to
        {
            return false;
        }
        if let Some(doc_type) = self.doc_type
            && record.doc_type != doc_type
        {
            return false;
        }
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }
        true
    }
}

/// Result of a successful sequential allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// The formatted document number, e.g. `INV-2025-006`.
    pub number: String,
    /// The committed sequence value behind the number.
    pub sequence: u32,
    /// The sequence year the allocation was filed under.
    pub year: i32,
    /// The ledger record written together with the counter update.
    pub record: AuditRecord,
}
