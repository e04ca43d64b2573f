//! Conversion primitives: path resolution, external converter invocation,
//! backup/restore, and artifact relocation.
//!
//! Every function here operates on one file and reports failures as
//! [`viewbridge_core::AppError`]; orchestration (sibling isolation, stage
//! logging, cleanup ordering) lives in `viewbridge-worker`.

pub mod backup;
pub mod converter;
pub mod paths;
pub mod relocate;

pub use backup::{backup_original, restore_original};
pub use converter::Converter;
pub use relocate::relocate;
