//! In-memory teacher and payment collections backed by snapshot storage.
//!
//! - [`TeacherRegistry`] owns teachers and pushes renames outward.
//! - [`PaymentRegistry`] owns payments and keeps their copied teacher names
//!   current through [`PaymentNameUpdater`].
//!
//! Every mutation builds the next collection, saves it, and only then swaps it
//! in, so a failed save leaves both memory and storage as they were.

mod payments;
mod teachers;

pub use payments::{PaymentFilter, PaymentRegistry, PaymentSummary};
pub use teachers::TeacherRegistry;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Receives teacher renames so copies of the name stay in agreement.
pub trait PaymentNameUpdater {
    /// Returns how many records were rewritten.
    fn rename_teacher(&mut self, teacher_id: &str, new_name: &str) -> Result<usize, StoreError>;
}
