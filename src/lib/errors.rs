//! Custom error types for lanekit operations.

use thiserror::Error;

use crate::model::{FlowcellPk, LaneId, PoolId, ReadLengthId, RecordId, SequencerId};

/// Result type alias for lanekit operations
pub type Result<T> = std::result::Result<T, LanekitError>;

/// A single field-level validation message for a flowcell draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field name
    pub field: String,
    /// Explanation of what is wrong with it
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error type for lanekit operations
#[derive(Error, Debug)]
pub enum LanekitError {
    /// A lane assignment request contained no lanes
    #[error("No lanes are provided")]
    NoLanes,

    /// A flowcell draft failed structural validation
    #[error("Invalid flowcell: {}", format_field_errors(.errors))]
    InvalidFlowcell {
        /// Field-level validation messages
        errors: Vec<FieldError>,
    },

    /// Referenced pool does not exist
    #[error("Pool {id} not found")]
    PoolNotFound {
        /// The missing pool id
        id: PoolId,
    },

    /// Referenced lane does not exist
    #[error("Lane {id} not found")]
    LaneNotFound {
        /// The missing lane id
        id: LaneId,
    },

    /// Referenced flowcell does not exist
    #[error("Flowcell {id} not found")]
    FlowcellNotFound {
        /// The missing flowcell primary key
        id: FlowcellPk,
    },

    /// Referenced sequencer does not exist
    #[error("Sequencer {id} not found")]
    SequencerNotFound {
        /// The missing sequencer id
        id: SequencerId,
    },

    /// Referenced read length does not exist
    #[error("Read length {id} not found")]
    ReadLengthNotFound {
        /// The missing read-length id
        id: ReadLengthId,
    },

    /// A pool references a member record that does not exist
    #[error("Record {id} not found")]
    RecordNotFound {
        /// The missing record id
        id: RecordId,
    },

    /// A pool with no members was asked for member-derived data
    #[error("Pool '{name}' has no libraries or samples")]
    EmptyPool {
        /// Name of the empty pool
        name: String,
    },

    /// An assignment batch would exceed a pool's capacity
    #[error("Pool '{pool}': {requested} lanes requested but capacity is {capacity}")]
    CapacityExceeded {
        /// Name of the over-requested pool
        pool: String,
        /// Lanes referencing the pool in the batch
        requested: u32,
        /// The pool's size multiplier
        capacity: u32,
    },

    /// The persistence layer rejected a read or write
    #[error("Storage error: {reason}")]
    Storage {
        /// Explanation from the storage layer
        reason: String,
    },
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_flowcell_lists_all_fields() {
        let error = LanekitError::InvalidFlowcell {
            errors: vec![
                FieldError { field: "flowcell_id".to_string(), message: "required".to_string() },
                FieldError { field: "sequencer".to_string(), message: "unknown".to_string() },
            ],
        };
        let msg = format!("{error}");
        assert!(msg.contains("flowcell_id: required"));
        assert!(msg.contains("sequencer: unknown"));
    }

    #[test]
    fn test_capacity_exceeded_message() {
        let error = LanekitError::CapacityExceeded {
            pool: "Pool_2".to_string(),
            requested: 3,
            capacity: 2,
        };
        let msg = format!("{error}");
        assert!(msg.contains("Pool_2"));
        assert!(msg.contains("3 lanes requested"));
        assert!(msg.contains("capacity is 2"));
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(format!("{}", LanekitError::PoolNotFound { id: 7 }), "Pool 7 not found");
        assert_eq!(format!("{}", LanekitError::LaneNotFound { id: 9 }), "Lane 9 not found");
    }
}
