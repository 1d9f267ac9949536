//! Core numbering types: templates, tenant settings, VAT timeline, errors.
//!
//! Everything here is pure data and computation. Persistence lives in
//! [`crate::store`], orchestration in [`crate::service`].

mod error;
mod format;
pub mod presets;
mod settings;
mod types;
mod vat;

pub use error::*;
pub use format::*;
pub use presets::format_presets;
pub use settings::*;
pub use types::*;
pub use vat::*;
