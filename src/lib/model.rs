//! Core entities: pools, their member records, flowcells, and lanes.

use serde::{Deserialize, Serialize};

use crate::status::{RecordKind, RecordStatus};

/// Opaque pool identifier
pub type PoolId = u32;
/// Opaque library/sample record identifier
pub type RecordId = u32;
/// Opaque lane identifier
pub type LaneId = u32;
/// Opaque flowcell primary key (distinct from the instrument-facing id)
pub type FlowcellPk = u32;
/// Opaque sequencer identifier
pub type SequencerId = u32;
/// Opaque read-length descriptor identifier
pub type ReadLengthId = u32;
/// Opaque index-type identifier, shared by I7 and I5 tables
pub type IndexTypeId = u32;

/// A library or sample belonging to a pool.
///
/// Both kinds share the full field set consumed downstream; [`RecordKind`]
/// tags which readiness threshold applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolableRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub name: String,
    /// Display identifier; also the sample-sheet row identity and sort tie-break
    pub barcode: String,
    pub status: RecordStatus,
    /// Raw I7 index sequence, empty when none was attached
    #[serde(default)]
    pub index_i7: String,
    /// Raw I5 index sequence, empty when none was attached
    #[serde(default)]
    pub index_i5: String,
    /// Index type used to resolve raw sequences to canonical index ids
    #[serde(default)]
    pub index_type: Option<IndexTypeId>,
    pub equal_representation_nucleotides: bool,
    pub read_length: ReadLengthId,
    /// Name of the owning request (sample-sheet project column)
    pub request_name: String,
    /// Library protocol name (sample-sheet description column); libraries only
    #[serde(default)]
    pub library_protocol: Option<String>,
}

impl PoolableRecord {
    /// Whether this member has reached its kind-specific readiness threshold.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status >= self.kind.ready_threshold()
    }
}

/// Capacity descriptor for a pool: how many lanes it can be loaded onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSize {
    pub id: u32,
    pub multiplier: u32,
}

/// A named group of library/sample records sharing a capacity and
/// loaded-count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    pub size: PoolSize,
    /// Lanes currently referencing this pool; must never exceed
    /// `size.multiplier`
    pub loaded: u32,
    pub library_ids: Vec<RecordId>,
    pub sample_ids: Vec<RecordId>,
}

impl Pool {
    /// True while the pool can accept further lane assignments.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.loaded < self.size.multiplier
    }

    /// Total member count across both kinds.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.library_ids.len() + self.sample_ids.len()
    }
}

/// Sequencer reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequencer {
    pub id: SequencerId,
    pub name: String,
}

/// Read-length reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadLength {
    pub id: ReadLengthId,
    pub name: String,
}

/// A physical sequencing run containing multiple lanes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowcell {
    pub id: FlowcellPk,
    /// Instrument-facing identifier, unique across flowcells
    pub flowcell_id: String,
    pub sequencer: SequencerId,
    pub lane_ids: Vec<LaneId>,
}

/// Unvalidated flowcell submitted with a lane-assignment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowcellDraft {
    pub flowcell_id: String,
    pub sequencer: SequencerId,
}

/// A single sequencer-run channel, bound to one flowcell and one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub name: String,
    pub pool: PoolId,
    /// Completed lanes are excluded from active listings
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub loading_concentration: Option<f64>,
    #[serde(default)]
    pub phix: Option<f64>,
}

impl Lane {
    /// Numeric lane index parsed from the second whitespace token of the
    /// lane name ("Lane 3" -> 3). Unparsable names degrade to 0 so an
    /// oddly named lane still exports.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.name.split_whitespace().nth(1).and_then(|token| token.parse().ok()).unwrap_or(0)
    }
}
