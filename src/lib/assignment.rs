//! Lane assignment: binding pools to the lanes of a new flowcell.
//!
//! Assignment is plan-then-commit: every referenced entity is resolved and
//! every precondition checked before a single [`AssignmentPlan`] is handed
//! to the store, which applies it atomically. A failure at any point leaves
//! the store in its pre-call state.

use ahash::AHashMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{LanekitError, Result};
use crate::model::{FlowcellDraft, FlowcellPk, PoolId, RecordId};
use crate::store::Store;
use crate::validation::validate_flowcell_draft;

/// One requested lane-to-pool binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneRequest {
    pub lane_name: String,
    pub pool_id: PoolId,
}

/// Wire shape of a lane-assignment request: a flowcell descriptor plus an
/// ordered list of lane bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub flowcell: FlowcellDraft,
    pub lanes: Vec<LaneRequest>,
}

/// A lane slated for creation, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLane {
    pub name: String,
    pub pool: PoolId,
}

/// Fully resolved mutation set for one assignment, applied atomically by
/// [`Store::apply_assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub flowcell: FlowcellDraft,
    pub lanes: Vec<PlannedLane>,
    /// Per-pool loaded count: the number of lanes referencing the pool in
    /// this batch. This overwrites the prior value rather than adding to
    /// it, mirroring the established bookkeeping semantic.
    pub pool_loaded: Vec<(PoolId, u32)>,
    /// Every member of every touched pool; all of them transition to the
    /// terminal loaded stage, regardless of prior status.
    pub member_ids: Vec<RecordId>,
}

/// Assign pools to the lanes of a new flowcell.
///
/// Creates the flowcell and one lane per request, sets each touched pool's
/// loaded count to the number of lanes referencing it in this batch, and
/// advances every member of each touched pool to the loaded stage.
///
/// # Errors
/// - [`LanekitError::NoLanes`] for an empty lane list
/// - [`LanekitError::InvalidFlowcell`] if the draft fails validation
/// - [`LanekitError::PoolNotFound`] for an unknown pool id
/// - [`LanekitError::CapacityExceeded`] if a batch references a pool more
///   times than its size multiplier
/// - [`LanekitError::Storage`] if the commit is rejected
///
/// None of these leave any partial mutation behind.
pub fn assign<S: Store + ?Sized>(
    store: &S,
    draft: &FlowcellDraft,
    lanes: &[LaneRequest],
) -> Result<FlowcellPk> {
    if lanes.is_empty() {
        return Err(LanekitError::NoLanes);
    }
    validate_flowcell_draft(store, draft)?;

    // Count how many lanes of this batch reference each pool
    let mut batch_counts: AHashMap<PoolId, u32> = AHashMap::new();
    for lane in lanes {
        *batch_counts.entry(lane.pool_id).or_insert(0) += 1;
    }

    let mut pool_ids: Vec<PoolId> = batch_counts.keys().copied().collect();
    pool_ids.sort_unstable();

    let mut pool_loaded = Vec::with_capacity(pool_ids.len());
    let mut member_ids = Vec::new();
    for pool_id in pool_ids {
        let pool = store.pool(pool_id)?;
        let requested = batch_counts[&pool_id];
        if requested > pool.size.multiplier {
            return Err(LanekitError::CapacityExceeded {
                pool: pool.name,
                requested,
                capacity: pool.size.multiplier,
            });
        }
        pool_loaded.push((pool_id, requested));
        member_ids.extend(pool.library_ids.iter().chain(pool.sample_ids.iter()));
    }

    let plan = AssignmentPlan {
        flowcell: draft.clone(),
        lanes: lanes
            .iter()
            .map(|l| PlannedLane { name: l.lane_name.clone(), pool: l.pool_id })
            .collect(),
        pool_loaded,
        member_ids,
    };

    let flowcell_pk = store.apply_assignment(&plan)?;
    info!(
        "Flowcell {} created: {} lanes, {} pools, {} records loaded",
        draft.flowcell_id,
        plan.lanes.len(),
        plan.pool_loaded.len(),
        plan.member_ids.len()
    );
    Ok(flowcell_pk)
}
