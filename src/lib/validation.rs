//! Input validation utilities
//!
//! Structural validation for flowcell drafts submitted with lane-assignment
//! requests. Failures carry field-level messages so the caller can surface
//! them next to the offending form field.

use crate::errors::{FieldError, LanekitError, Result};
use crate::model::FlowcellDraft;
use crate::store::Store;

/// Validate a flowcell draft against the store.
///
/// Checks that the instrument-facing `flowcell_id` is present and unique
/// and that the referenced sequencer exists. All failures are collected
/// into a single [`LanekitError::InvalidFlowcell`] rather than returning
/// on the first one.
///
/// # Errors
/// Returns `InvalidFlowcell` with one [`FieldError`] per failed check.
pub fn validate_flowcell_draft<S: Store + ?Sized>(store: &S, draft: &FlowcellDraft) -> Result<()> {
    let mut errors = Vec::new();

    if draft.flowcell_id.trim().is_empty() {
        errors.push(FieldError {
            field: "flowcell_id".to_string(),
            message: "This field is required".to_string(),
        });
    } else if store.flowcell_id_taken(&draft.flowcell_id) {
        errors.push(FieldError {
            field: "flowcell_id".to_string(),
            message: format!("Flowcell '{}' already exists", draft.flowcell_id),
        });
    }

    if store.sequencer(draft.sequencer).is_err() {
        errors.push(FieldError {
            field: "sequencer".to_string(),
            message: format!("Unknown sequencer {}", draft.sequencer),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(LanekitError::InvalidFlowcell { errors }) }
}
