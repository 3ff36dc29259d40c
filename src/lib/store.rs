//! Storage collaborator boundary.
//!
//! The engine and generators talk to persistence only through the [`Store`]
//! trait: keyed reads, containment queries, and a single atomic
//! [`Store::apply_assignment`] commit. [`MemoryStore`] is the reference
//! implementation backing the CLI; it keeps all state behind one
//! `parking_lot::RwLock` and round-trips through a JSON snapshot file.

use std::path::Path;

use ahash::AHashMap;
use anyhow::Context;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::assignment::AssignmentPlan;
use crate::errors::{LanekitError, Result};
use crate::index_lookup::{IndexEntry, IndexLookup};
use crate::model::{
    Flowcell, FlowcellPk, Lane, LaneId, Pool, PoolId, PoolableRecord, ReadLength, ReadLengthId,
    RecordId, Sequencer, SequencerId,
};

/// Read/update contract the engine and generators are written against.
///
/// Implementations must guarantee that `apply_assignment` is all-or-nothing:
/// either every staged mutation becomes visible or none does.
pub trait Store {
    /// Fetch a pool by id.
    fn pool(&self, id: PoolId) -> Result<Pool>;

    /// All pools, ordered by id ascending.
    fn pools(&self) -> Vec<Pool>;

    /// Member records of a pool, libraries first, then samples, each in
    /// pool insertion order.
    fn pool_members(&self, pool: &Pool) -> Result<Vec<PoolableRecord>>;

    /// Fetch a lane by id.
    fn lane(&self, id: LaneId) -> Result<Lane>;

    /// Every non-completed lane paired with its owning flowcell.
    fn active_lanes(&self) -> Vec<(Flowcell, Lane)>;

    /// Fetch a flowcell by primary key.
    fn flowcell(&self, id: FlowcellPk) -> Result<Flowcell>;

    /// The flowcell owning the given lane.
    fn flowcell_of_lane(&self, lane: LaneId) -> Result<Flowcell>;

    /// Fetch a sequencer by id.
    fn sequencer(&self, id: SequencerId) -> Result<Sequencer>;

    /// Fetch a read-length descriptor by id.
    fn read_length(&self, id: ReadLengthId) -> Result<ReadLength>;

    /// Whether an instrument-facing flowcell id is already in use.
    fn flowcell_id_taken(&self, flowcell_id: &str) -> bool;

    /// Commit a validated assignment plan atomically and return the new
    /// flowcell's primary key. On error the store is unchanged.
    fn apply_assignment(&self, plan: &AssignmentPlan) -> Result<FlowcellPk>;
}

/// On-disk snapshot format: flat entity lists, human-editable JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub records: Vec<PoolableRecord>,
    #[serde(default)]
    pub flowcells: Vec<Flowcell>,
    #[serde(default)]
    pub lanes: Vec<Lane>,
    #[serde(default)]
    pub sequencers: Vec<Sequencer>,
    #[serde(default)]
    pub read_lengths: Vec<ReadLength>,
    #[serde(default)]
    pub indices_i7: Vec<IndexEntry>,
    #[serde(default)]
    pub indices_i5: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Default)]
struct State {
    pools: AHashMap<PoolId, Pool>,
    records: AHashMap<RecordId, PoolableRecord>,
    flowcells: AHashMap<FlowcellPk, Flowcell>,
    lanes: AHashMap<LaneId, Lane>,
    sequencers: AHashMap<SequencerId, Sequencer>,
    read_lengths: AHashMap<ReadLengthId, ReadLength>,
    indices_i7: Vec<IndexEntry>,
    indices_i5: Vec<IndexEntry>,
}

impl State {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        State {
            pools: snapshot.pools.into_iter().map(|p| (p.id, p)).collect(),
            records: snapshot.records.into_iter().map(|r| (r.id, r)).collect(),
            flowcells: snapshot.flowcells.into_iter().map(|f| (f.id, f)).collect(),
            lanes: snapshot.lanes.into_iter().map(|l| (l.id, l)).collect(),
            sequencers: snapshot.sequencers.into_iter().map(|s| (s.id, s)).collect(),
            read_lengths: snapshot.read_lengths.into_iter().map(|r| (r.id, r)).collect(),
            indices_i7: snapshot.indices_i7,
            indices_i5: snapshot.indices_i5,
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        fn sorted<T: Clone>(map: &AHashMap<u32, T>) -> Vec<T> {
            let mut ids: Vec<u32> = map.keys().copied().collect();
            ids.sort_unstable();
            ids.into_iter().map(|id| map[&id].clone()).collect()
        }
        Snapshot {
            pools: sorted(&self.pools),
            records: sorted(&self.records),
            flowcells: sorted(&self.flowcells),
            lanes: sorted(&self.lanes),
            sequencers: sorted(&self.sequencers),
            read_lengths: sorted(&self.read_lengths),
            indices_i7: self.indices_i7.clone(),
            indices_i5: self.indices_i5.clone(),
        }
    }

    fn next_lane_id(&self) -> LaneId {
        self.lanes.keys().max().copied().unwrap_or(0) + 1
    }

    fn next_flowcell_pk(&self) -> FlowcellPk {
        self.flowcells.keys().max().copied().unwrap_or(0) + 1
    }
}

/// In-memory store guarded by a single `RwLock`.
///
/// Reads take the read lock and see a consistent snapshot; the assignment
/// commit takes the write lock for the whole plan, so concurrent
/// assignments cannot interleave the capacity check, the loaded-count
/// overwrite, and the bulk status transition.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Build a store from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        MemoryStore { state: RwLock::new(State::from_snapshot(snapshot)) }
    }

    /// Load a store from a JSON snapshot file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not a valid snapshot.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let text = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read store file: {}", path_ref.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse store file: {}", path_ref.display()))?;
        Ok(MemoryStore::from_snapshot(snapshot))
    }

    /// Write the current state back to a JSON snapshot file.
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let snapshot = self.state.read().to_snapshot();
        let text = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path_ref, text)
            .with_context(|| format!("Failed to write store file: {}", path_ref.display()))
    }

    /// Build the index lookup tables carried in the snapshot.
    #[must_use]
    pub fn index_lookup(&self) -> IndexLookup {
        let state = self.state.read();
        IndexLookup::new(&state.indices_i7, &state.indices_i5)
    }
}

impl Store for MemoryStore {
    fn pool(&self, id: PoolId) -> Result<Pool> {
        self.state.read().pools.get(&id).cloned().ok_or(LanekitError::PoolNotFound { id })
    }

    fn pools(&self) -> Vec<Pool> {
        let state = self.state.read();
        let mut pools: Vec<Pool> = state.pools.values().cloned().collect();
        pools.sort_unstable_by_key(|p| p.id);
        pools
    }

    fn pool_members(&self, pool: &Pool) -> Result<Vec<PoolableRecord>> {
        let state = self.state.read();
        pool.library_ids
            .iter()
            .chain(pool.sample_ids.iter())
            .map(|&id| {
                state.records.get(&id).cloned().ok_or(LanekitError::RecordNotFound { id })
            })
            .collect()
    }

    fn lane(&self, id: LaneId) -> Result<Lane> {
        self.state.read().lanes.get(&id).cloned().ok_or(LanekitError::LaneNotFound { id })
    }

    fn active_lanes(&self) -> Vec<(Flowcell, Lane)> {
        let state = self.state.read();
        let mut result = Vec::new();
        for flowcell in state.flowcells.values() {
            for lane_id in &flowcell.lane_ids {
                if let Some(lane) = state.lanes.get(lane_id) {
                    if !lane.completed {
                        result.push((flowcell.clone(), lane.clone()));
                    }
                }
            }
        }
        result
    }

    fn flowcell(&self, id: FlowcellPk) -> Result<Flowcell> {
        self.state.read().flowcells.get(&id).cloned().ok_or(LanekitError::FlowcellNotFound { id })
    }

    fn flowcell_of_lane(&self, lane: LaneId) -> Result<Flowcell> {
        let state = self.state.read();
        state
            .flowcells
            .values()
            .find(|f| f.lane_ids.contains(&lane))
            .cloned()
            .ok_or(LanekitError::LaneNotFound { id: lane })
    }

    fn sequencer(&self, id: SequencerId) -> Result<Sequencer> {
        self.state.read().sequencers.get(&id).cloned().ok_or(LanekitError::SequencerNotFound { id })
    }

    fn read_length(&self, id: ReadLengthId) -> Result<ReadLength> {
        self.state
            .read()
            .read_lengths
            .get(&id)
            .cloned()
            .ok_or(LanekitError::ReadLengthNotFound { id })
    }

    fn flowcell_id_taken(&self, flowcell_id: &str) -> bool {
        self.state.read().flowcells.values().any(|f| f.flowcell_id == flowcell_id)
    }

    fn apply_assignment(&self, plan: &AssignmentPlan) -> Result<FlowcellPk> {
        let mut state = self.state.write();

        // Stage the whole plan on a copy; swap it in only if every step
        // succeeded, so a mid-sequence failure leaves no partial mutation.
        let mut staged = state.clone();

        let flowcell_pk = staged.next_flowcell_pk();
        let mut lane_ids = Vec::with_capacity(plan.lanes.len());
        for planned in &plan.lanes {
            let id = staged.next_lane_id();
            staged.lanes.insert(
                id,
                Lane {
                    id,
                    name: planned.name.clone(),
                    pool: planned.pool,
                    completed: false,
                    loading_concentration: None,
                    phix: None,
                },
            );
            lane_ids.push(id);
        }

        for &(pool_id, loaded) in &plan.pool_loaded {
            let pool = staged
                .pools
                .get_mut(&pool_id)
                .ok_or(LanekitError::PoolNotFound { id: pool_id })?;
            pool.loaded = loaded;
        }

        for &record_id in &plan.member_ids {
            let record = staged.records.get_mut(&record_id).ok_or(LanekitError::Storage {
                reason: format!("record {record_id} referenced by a pool is missing"),
            })?;
            record.status.advance_to_loaded();
        }

        staged.flowcells.insert(
            flowcell_pk,
            Flowcell {
                id: flowcell_pk,
                flowcell_id: plan.flowcell.flowcell_id.clone(),
                sequencer: plan.flowcell.sequencer,
                lane_ids,
            },
        );

        *state = staged;
        Ok(flowcell_pk)
    }
}
