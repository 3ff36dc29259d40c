//! Benchtop loading protocol generation.
//!
//! One summary row per lane, in lane-name order, for the bench scientist
//! loading the flowcell. Unlike the sample sheet there is no global resort,
//! and the I7/I5 columns are deliberately left blank in this protocol.

use std::path::{Path, PathBuf};

use anyhow::Context;
use fgoxide::io::DelimFile;
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{LanekitError, Result};
use crate::model::LaneId;
use crate::store::Store;

/// Filename the benchtop spreadsheet is saved under.
pub const BENCHTOP_FILENAME: &str = "FC_Loading_Benchtop_Protocol.xls";

/// One row of the benchtop loading protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchtopRow {
    #[serde(rename = "Pool ID")]
    pub pool: String,
    #[serde(rename = "Flowcell ID")]
    pub flowcell_id: String,
    #[serde(rename = "Sequencer")]
    pub sequencer: String,
    #[serde(rename = "Lane")]
    pub lane: String,
    /// Blank by design in this protocol
    #[serde(rename = "I7 present")]
    pub i7_present: String,
    /// Blank by design in this protocol
    #[serde(rename = "I5 present")]
    pub i5_present: String,
    /// All non-withdrawn members of the lane's pool carry the flag
    #[serde(rename = "Equal Representation of Nucleotides")]
    pub equal_representation: bool,
    #[serde(rename = "Read Length")]
    pub read_length: String,
    #[serde(rename = "Loading Concentration")]
    pub loading_concentration: Option<f64>,
    #[serde(rename = "PhiX %")]
    pub phix: Option<f64>,
}

/// Collect the benchtop protocol rows for the given lanes, ordered by lane
/// name ascending.
///
/// The read length comes from the first library of the lane's pool if any
/// exist, else from the first sample. The equal-representation flag spans
/// non-withdrawn members only, a narrower scope than the readiness
/// listing's full-pool aggregation.
///
/// # Errors
/// Fails if a lane, its flowcell, or its pool cannot be resolved, or if
/// the pool has no members at all.
pub fn generate<S: Store + ?Sized>(store: &S, lane_ids: &[LaneId]) -> Result<Vec<BenchtopRow>> {
    let lanes = lane_ids
        .iter()
        .map(|&id| store.lane(id))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect_vec();

    let mut rows = Vec::with_capacity(lanes.len());
    for lane in &lanes {
        let flowcell = store.flowcell_of_lane(lane.id)?;
        let sequencer = store.sequencer(flowcell.sequencer)?;
        let pool = store.pool(lane.pool)?;
        let members = store.pool_members(&pool)?;

        // Libraries come first from the store, so the first member is the
        // first library when the pool has any
        let reference = members
            .first()
            .ok_or_else(|| LanekitError::EmptyPool { name: pool.name.clone() })?;
        let read_length = store.read_length(reference.read_length)?;

        let equal_representation = members
            .iter()
            .filter(|m| !m.status.is_withdrawn())
            .all(|m| m.equal_representation_nucleotides);

        rows.push(BenchtopRow {
            pool: pool.name.clone(),
            flowcell_id: flowcell.flowcell_id,
            sequencer: sequencer.name,
            lane: lane.name.clone(),
            i7_present: String::new(),
            i5_present: String::new(),
            equal_representation,
            read_length: read_length.name,
            loading_concentration: lane.loading_concentration,
            phix: lane.phix,
        });
    }
    Ok(rows)
}

/// Write the benchtop protocol into `dir` under the expected filename and
/// return the full path.
///
/// # Errors
/// Fails if the file cannot be written.
pub fn write_benchtop_file<P: AsRef<Path>>(dir: P, rows: &[BenchtopRow]) -> anyhow::Result<PathBuf> {
    let path = dir.as_ref().join(BENCHTOP_FILENAME);
    DelimFile::default()
        .write_tsv(&path, rows)
        .with_context(|| format!("Failed to write benchtop protocol: {}", path.display()))?;
    info!("Wrote {} benchtop protocol rows to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Flowcell, Lane, Pool, PoolSize, Sequencer};
    use crate::status::RecordStatus;
    use crate::store::tests::{library, sample, seeded_store};
    use crate::store::{MemoryStore, Snapshot};

    fn lane(id: LaneId, name: &str, pool: u32) -> Lane {
        Lane {
            id,
            name: name.to_string(),
            pool,
            completed: false,
            loading_concentration: Some(1.6),
            phix: Some(1.0),
        }
    }

    /// A flowcell with two lanes whose pools exercise both
    /// equal-representation outcomes.
    fn benchtop_store() -> MemoryStore {
        // Pool 1: a withdrawn member without the flag must not count
        let lib1 = library(1, "LIB001", RecordStatus::OnFlowcell);
        let mut lib2 = library(2, "LIB002", RecordStatus::Withdrawn);
        lib2.equal_representation_nucleotides = false;
        // Pool 2: an active member without the flag does count
        let mut lib3 = library(3, "LIB003", RecordStatus::OnFlowcell);
        lib3.equal_representation_nucleotides = false;

        MemoryStore::from_snapshot(Snapshot {
            pools: vec![
                Pool {
                    id: 1,
                    name: "Pool_A".to_string(),
                    size: PoolSize { id: 1, multiplier: 1 },
                    loaded: 1,
                    library_ids: vec![1, 2],
                    sample_ids: vec![],
                },
                Pool {
                    id: 2,
                    name: "Pool_B".to_string(),
                    size: PoolSize { id: 1, multiplier: 1 },
                    loaded: 1,
                    library_ids: vec![3],
                    sample_ids: vec![],
                },
            ],
            records: vec![lib1, lib2, lib3],
            flowcells: vec![Flowcell {
                id: 1,
                flowcell_id: "FC100".to_string(),
                sequencer: 1,
                lane_ids: vec![1, 2],
            }],
            lanes: vec![lane(1, "Lane 2", 2), lane(2, "Lane 1", 1)],
            sequencers: vec![Sequencer { id: 1, name: "HiSeq 2000".to_string() }],
            read_lengths: vec![crate::model::ReadLength { id: 1, name: "1x50".to_string() }],
            ..Snapshot::default()
        })
    }

    #[test]
    fn test_one_row_per_lane_ordered_by_name() {
        let store = benchtop_store();
        let rows = generate(&store, &[1, 2]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].lane, "Lane 1");
        assert_eq!(rows[0].pool, "Pool_A");
        assert_eq!(rows[1].lane, "Lane 2");
        assert_eq!(rows[1].pool, "Pool_B");
    }

    #[test]
    fn test_equal_representation_ignores_withdrawn_members() {
        let store = benchtop_store();
        let rows = generate(&store, &[1, 2]).unwrap();
        // Pool_A's only flag-less member is withdrawn
        assert!(rows[0].equal_representation);
        // Pool_B's flag-less member is active
        assert!(!rows[1].equal_representation);
    }

    #[test]
    fn test_i7_i5_columns_are_blank() {
        let store = benchtop_store();
        for row in generate(&store, &[1, 2]).unwrap() {
            assert_eq!(row.i7_present, "");
            assert_eq!(row.i5_present, "");
        }
    }

    #[test]
    fn test_row_fields() {
        let store = benchtop_store();
        let rows = generate(&store, &[1]).unwrap();
        let row = &rows[0];
        assert_eq!(row.flowcell_id, "FC100");
        assert_eq!(row.sequencer, "HiSeq 2000");
        assert_eq!(row.read_length, "1x50");
        assert_eq!(row.loading_concentration, Some(1.6));
        assert_eq!(row.phix, Some(1.0));
    }

    #[test]
    fn test_read_length_falls_back_to_samples() {
        let smp = sample(1, "SMP001", RecordStatus::OnFlowcell);
        let store = MemoryStore::from_snapshot(Snapshot {
            pools: vec![Pool {
                id: 1,
                name: "P".to_string(),
                size: PoolSize { id: 1, multiplier: 1 },
                loaded: 1,
                library_ids: vec![],
                sample_ids: vec![1],
            }],
            records: vec![smp],
            flowcells: vec![Flowcell {
                id: 1,
                flowcell_id: "FC100".to_string(),
                sequencer: 1,
                lane_ids: vec![1],
            }],
            lanes: vec![lane(1, "Lane 1", 1)],
            sequencers: vec![Sequencer { id: 1, name: "HiSeq 2000".to_string() }],
            read_lengths: vec![crate::model::ReadLength { id: 1, name: "1x50".to_string() }],
            ..Snapshot::default()
        });
        let rows = generate(&store, &[1]).unwrap();
        assert_eq!(rows[0].read_length, "1x50");
    }

    #[test]
    fn test_missing_lane_fails() {
        let store = seeded_store();
        assert!(matches!(
            generate(&store, &[99]),
            Err(LanekitError::LaneNotFound { id: 99 })
        ));
    }

    #[test]
    fn test_written_protocol_has_expected_header() {
        let store = benchtop_store();
        let rows = generate(&store, &[1, 2]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_benchtop_file(dir.path(), &rows).unwrap();
        assert!(path.ends_with(BENCHTOP_FILENAME));

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "Pool ID\tFlowcell ID\tSequencer\tLane\tI7 present\tI5 present\t\
             Equal Representation of Nucleotides\tRead Length\t\
             Loading Concentration\tPhiX %"
        );
        assert_eq!(text.lines().count(), 3);
    }
}
