//! # nommer
//!
//! Tenant-scoped sequential document numbering for invoices and credit
//! notes, with VAT-rate history resolution and an append-only audit
//! ledger. Allocation is atomic: the counter bump and its audit record
//! commit together, so concurrent callers always receive distinct,
//! contiguous numbers. Voided numbers are retired permanently.
//!
//! All rates and amounts use [`rust_decimal::Decimal`] — never floating
//! point.
//!
//! ## Quick Start
//!
//! ```rust
//! use nommer::{AuditFilter, NumberingService, TenantId};
//!
//! let service = NumberingService::in_memory();
//! let tenant = TenantId::new("acme");
//!
//! let preview = service.preview_invoice_number(&tenant).unwrap();
//! let issued = service.generate_invoice_number(&tenant).unwrap();
//! assert_eq!(issued.number, preview);
//! assert_eq!(issued.sequence, 1);
//!
//! service
//!     .void_number(&tenant, nommer::DocumentType::Invoice, &issued.number, "duplicate charge")
//!     .unwrap();
//! let trail = service.audit(&tenant, &AuditFilter::default()).unwrap();
//! assert!(trail[0].is_voided());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Numbering, settings, VAT timeline, audit ledger |
//! | `export` | Audit ledger CSV export |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod store;

#[cfg(feature = "core")]
pub mod allocator;

#[cfg(feature = "core")]
pub mod ledger;

#[cfg(feature = "core")]
pub mod policy;

#[cfg(feature = "core")]
pub mod service;

#[cfg(feature = "export")]
pub mod export;

// Re-export the working surface at the crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
#[cfg(feature = "core")]
pub use crate::service::{Clock, NumberingService};
#[cfg(feature = "core")]
pub use crate::store::{InMemoryStore, NumberingStore};
