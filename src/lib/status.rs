//! Member lifecycle statuses and readiness thresholds.
//!
//! Libraries and samples move through the same numeric status ladder, but
//! qualify for pooling one stage apart: a library is loadable once quality
//! control has cleared it, while a sample additionally needs library
//! preparation. The terminal [`RecordStatus::OnFlowcell`] stage is reached
//! only through [`RecordStatus::advance_to_loaded`], applied in bulk by the
//! lane assignment engine.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a library or sample.
///
/// The discriminants match the status codes persisted in store snapshots,
/// so ordering comparisons (`>=` a threshold) work directly on the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
#[repr(i8)]
pub enum RecordStatus {
    /// Failed or withdrawn; excluded from exports
    Withdrawn = -1,
    /// Submitted by the requesting group, not yet received
    Submitted = 0,
    /// Received and awaiting quality control
    QualityApproved = 1,
    /// Quality control passed; a library is ready for pooling here
    PoolingReady = 2,
    /// Library preparation done; a sample is ready for pooling here
    PreparationDone = 3,
    /// Member of an assembled pool
    Pooled = 4,
    /// Loaded onto a flowcell lane (terminal)
    OnFlowcell = 5,
}

impl RecordStatus {
    /// True for the failed/withdrawn sentinel.
    #[must_use]
    pub fn is_withdrawn(self) -> bool {
        self == RecordStatus::Withdrawn
    }

    /// Transition to the terminal loaded stage.
    ///
    /// Applied unconditionally to every member of a pool when the pool is
    /// assigned to one or more lanes; there is no per-member filtering.
    pub fn advance_to_loaded(&mut self) {
        *self = RecordStatus::OnFlowcell;
    }
}

impl From<RecordStatus> for i8 {
    fn from(status: RecordStatus) -> Self {
        status as i8
    }
}

impl TryFrom<i8> for RecordStatus {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            -1 => Ok(RecordStatus::Withdrawn),
            0 => Ok(RecordStatus::Submitted),
            1 => Ok(RecordStatus::QualityApproved),
            2 => Ok(RecordStatus::PoolingReady),
            3 => Ok(RecordStatus::PreparationDone),
            4 => Ok(RecordStatus::Pooled),
            5 => Ok(RecordStatus::OnFlowcell),
            other => Err(format!("unknown record status code: {other}")),
        }
    }
}

/// Whether a member record is a library or a sample.
///
/// The two kinds share every downstream field; they differ only in the
/// readiness threshold and in which sample-sheet columns they populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A prepared library, poolable directly
    Library,
    /// A raw sample, poolable only after library preparation
    Sample,
}

impl RecordKind {
    /// Minimum status at which a member of this kind counts as ready for
    /// loading. Libraries qualify one stage earlier than samples.
    #[must_use]
    pub fn ready_threshold(self) -> RecordStatus {
        match self {
            RecordKind::Library => RecordStatus::PoolingReady,
            RecordKind::Sample => RecordStatus::PreparationDone,
        }
    }
}
