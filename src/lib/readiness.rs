//! Pool readiness evaluation and the listings built on it.
//!
//! A pool is offered for loading once every member has reached its
//! kind-specific readiness threshold and the pool still has lane capacity.
//! The aggregate display flags are asymmetric on purpose: index presence is
//! an "any member" check, equal representation an "all members" check.

use log::debug;
use serde::Serialize;

use crate::errors::{LanekitError, Result};
use crate::model::{
    FlowcellPk, LaneId, Pool, PoolId, PoolableRecord, ReadLength, ReadLengthId, SequencerId,
};
use crate::status::RecordKind;
use crate::store::Store;

/// Aggregate readiness view of one pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolReadiness {
    /// Every member is at or past its readiness threshold and the pool has
    /// remaining lane capacity
    pub eligible: bool,
    /// At least one member carries a non-empty I7 index
    pub index_i7_present: bool,
    /// At least one member carries a non-empty I5 index
    pub index_i5_present: bool,
    /// Every member has balanced nucleotide representation
    pub equal_representation: bool,
    /// Read length shared by the pool, taken from a sample if any exist,
    /// else from a library
    pub read_length: ReadLength,
}

/// One entry of the pool-eligibility listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCandidate {
    pub id: PoolId,
    pub name: String,
    pub read_length: ReadLengthId,
    pub read_length_name: String,
    pub pool_size_id: u32,
    /// Capacity: how many lanes the pool may be loaded onto
    pub size: u32,
    pub loaded: u32,
}

/// One entry of the active-lane listing: a non-completed lane with its
/// flowcell context and the pool's display flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneSummary {
    pub flowcell_id: String,
    pub flowcell: FlowcellPk,
    pub lane_id: LaneId,
    pub lane_name: String,
    pub pool: PoolId,
    pub pool_name: String,
    pub read_length_name: String,
    pub index_i7_present: bool,
    pub index_i5_present: bool,
    pub equal_representation: bool,
    pub sequencer: SequencerId,
    pub sequencer_name: String,
    pub loading_concentration: Option<f64>,
    pub phix: Option<f64>,
}

/// Index-presence ("any") and equal-representation ("all") flags over a
/// member slice. The any/all asymmetry is part of the contract.
fn aggregate_flags(members: &[PoolableRecord]) -> (bool, bool, bool) {
    let index_i7_present = members.iter().any(|m| !m.index_i7.is_empty());
    let index_i5_present = members.iter().any(|m| !m.index_i5.is_empty());
    let equal_representation = members.iter().all(|m| m.equal_representation_nucleotides);
    (index_i7_present, index_i5_present, equal_representation)
}

/// The pool's shared read length: from the first sample if any exist,
/// otherwise from the first library.
fn member_read_length(members: &[PoolableRecord]) -> Option<&PoolableRecord> {
    members.iter().find(|m| m.kind == RecordKind::Sample).or_else(|| members.first())
}

/// Evaluate one pool's readiness and display flags.
///
/// Pure read: neither the pool nor its members are mutated.
///
/// # Errors
/// Fails with [`LanekitError::EmptyPool`] if the pool has no members, and
/// propagates store read failures.
pub fn evaluate<S: Store + ?Sized>(store: &S, pool: &Pool) -> Result<PoolReadiness> {
    let members = store.pool_members(pool)?;
    let reference = member_read_length(&members)
        .ok_or_else(|| LanekitError::EmptyPool { name: pool.name.clone() })?;
    let read_length = store.read_length(reference.read_length)?;

    let (index_i7_present, index_i5_present, equal_representation) = aggregate_flags(&members);
    let eligible = members.iter().all(PoolableRecord::is_ready) && pool.has_capacity();

    Ok(PoolReadiness {
        eligible,
        index_i7_present,
        index_i5_present,
        equal_representation,
        read_length,
    })
}

/// The pool-eligibility listing: every eligible pool, ordered by pool id
/// ascending.
///
/// Pools with no members at all are skipped entirely rather than listed as
/// ineligible.
///
/// # Errors
/// Propagates store read failures.
pub fn eligible_pools<S: Store + ?Sized>(store: &S) -> Result<Vec<PoolCandidate>> {
    let mut candidates = Vec::new();
    for pool in store.pools() {
        if pool.member_count() == 0 {
            debug!("No libraries and samples in {}", pool.name);
            continue;
        }
        let readiness = evaluate(store, &pool)?;
        if !readiness.eligible {
            continue;
        }
        candidates.push(PoolCandidate {
            id: pool.id,
            name: pool.name.clone(),
            read_length: readiness.read_length.id,
            read_length_name: readiness.read_length.name,
            pool_size_id: pool.size.id,
            size: pool.size.multiplier,
            loaded: pool.loaded,
        });
    }
    Ok(candidates)
}

/// The active-lane listing: one row per non-completed lane across all
/// flowcells, ordered by `(flowcell_id, lane_name)`.
///
/// # Errors
/// Propagates store read failures.
pub fn active_lanes<S: Store + ?Sized>(store: &S) -> Result<Vec<LaneSummary>> {
    let mut summaries = Vec::new();
    for (flowcell, lane) in store.active_lanes() {
        let pool = store.pool(lane.pool)?;
        if pool.member_count() == 0 {
            debug!("No libraries and samples in {}", pool.name);
            continue;
        }
        let readiness = evaluate(store, &pool)?;
        let sequencer = store.sequencer(flowcell.sequencer)?;

        summaries.push(LaneSummary {
            flowcell_id: flowcell.flowcell_id,
            flowcell: flowcell.id,
            lane_id: lane.id,
            lane_name: lane.name,
            pool: pool.id,
            pool_name: pool.name,
            read_length_name: readiness.read_length.name,
            index_i7_present: readiness.index_i7_present,
            index_i5_present: readiness.index_i5_present,
            equal_representation: readiness.equal_representation,
            sequencer: sequencer.id,
            sequencer_name: sequencer.name,
            loading_concentration: lane.loading_concentration,
            phix: lane.phix,
        });
    }
    summaries.sort_by(|a, b| {
        (&a.flowcell_id, &a.lane_name).cmp(&(&b.flowcell_id, &b.lane_name))
    });
    Ok(summaries)
}
