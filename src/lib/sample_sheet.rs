//! Instrument sample-sheet generation.
//!
//! Produces the demultiplexing sample sheet for a set of lanes: a fixed
//! `[Header]`/`[Reads]`/`[Settings]` preamble followed by one `[Data]` row
//! per non-withdrawn member record. The downstream instrument software
//! reconciles this sheet against other lab documents, so the row ordering
//! and the exact column layout are contractual.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use itertools::Itertools;
use log::info;

use crate::ascii::fold_ascii;
use crate::errors::Result;
use crate::index_lookup::IndexLookup;
use crate::model::{FlowcellPk, Lane, LaneId, PoolableRecord};
use crate::store::Store;

/// Number of columns in every sample-sheet row, preamble included.
const COLUMNS: usize = 11;

/// Fixed adapter trimmed by the instrument's FASTQ generation.
const ADAPTER: &str = "CTGTCTCTTATACACATCT";

/// One `[Data]` row of the sample sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSheetRow {
    /// Numeric lane index parsed from the lane name
    pub lane: u32,
    /// The record's barcode
    pub sample_id: String,
    pub sample_name: String,
    /// Canonical I7 identifier, empty when the lookup missed
    pub i7_index_id: String,
    /// Raw I7 sequence
    pub index: String,
    /// Canonical I5 identifier, empty when the lookup missed
    pub i5_index_id: String,
    /// Raw I5 sequence
    pub index2: String,
    /// ASCII-folded owning request name
    pub sample_project: String,
    /// ASCII-folded library protocol name
    pub description: String,
}

/// Filename the instrument expects for a flowcell's sample sheet.
#[must_use]
pub fn sheet_filename(flowcell_id: &str) -> String {
    format!("{flowcell_id}_SampleSheet.csv")
}

fn build_row(lane: &Lane, record: &PoolableRecord, lookup: &IndexLookup) -> SampleSheetRow {
    // Unresolvable indices degrade to empty identifiers; the id columns are
    // advisory display data
    let (i7_index_id, i5_index_id) = match record.index_type {
        Some(index_type) => (
            lookup.resolve_i7(&record.index_i7, index_type).unwrap_or("").to_string(),
            lookup.resolve_i5(&record.index_i5, index_type).unwrap_or("").to_string(),
        ),
        None => (String::new(), String::new()),
    };

    SampleSheetRow {
        lane: lane.number(),
        sample_id: record.barcode.clone(),
        sample_name: record.name.clone(),
        i7_index_id,
        index: record.index_i7.clone(),
        i5_index_id,
        index2: record.index_i5.clone(),
        sample_project: fold_ascii(&record.request_name),
        description: fold_ascii(record.library_protocol.as_deref().unwrap_or("")),
    }
}

/// Barcode with its 3-character prefix stripped; the secondary sort key.
fn barcode_suffix(barcode: &str) -> String {
    barcode.chars().skip(3).collect()
}

/// Collect the sample-sheet rows for the given lanes of a flowcell.
///
/// Lanes are fetched in lane-name order and each contributes every
/// non-withdrawn member of its pool, libraries before samples. The combined
/// rows are then resorted globally by `(lane number, barcode suffix)` --
/// the per-lane fetch order is deliberately discarded.
///
/// # Errors
/// Fails if the flowcell or any requested lane does not exist; missing
/// display data degrades to empty cells instead of failing.
pub fn generate<S: Store + ?Sized>(
    store: &S,
    lookup: &IndexLookup,
    flowcell: FlowcellPk,
    lane_ids: &[LaneId],
) -> Result<Vec<SampleSheetRow>> {
    store.flowcell(flowcell)?;

    let lanes = lane_ids
        .iter()
        .map(|&id| store.lane(id))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect_vec();

    let mut rows = Vec::new();
    for lane in &lanes {
        let pool = store.pool(lane.pool)?;
        for record in store.pool_members(&pool)? {
            if record.status.is_withdrawn() {
                continue;
            }
            rows.push(build_row(lane, &record, lookup));
        }
    }

    rows.sort_by(|a, b| {
        (a.lane, barcode_suffix(&a.sample_id)).cmp(&(b.lane, barcode_suffix(&b.sample_id)))
    });
    Ok(rows)
}

fn write_padded<W: Write>(writer: &mut csv::Writer<W>, fields: &[&str]) -> csv::Result<()> {
    let mut record: Vec<&str> = Vec::with_capacity(COLUMNS);
    record.extend_from_slice(fields);
    record.resize(COLUMNS, "");
    writer.write_record(&record)
}

/// Write a complete sample sheet to `writer`.
///
/// The preamble literals (IEM file version, workflow, assay, chemistry,
/// cycle counts, adapter) are fixed by the instrument sheet template.
///
/// # Errors
/// Fails on I/O errors from the underlying writer.
pub fn write_sample_sheet<W: Write>(writer: W, rows: &[SampleSheetRow]) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    write_padded(&mut csv_writer, &["[Header]"])?;
    write_padded(&mut csv_writer, &["IEMFileVersion", "4"])?;
    write_padded(&mut csv_writer, &["Date", "11/3/2016"])?;
    write_padded(&mut csv_writer, &["Workflow", "GenerateFASTQ"])?;
    write_padded(&mut csv_writer, &["Application", "HiSeq FASTQ Only"])?;
    write_padded(&mut csv_writer, &["Assay", "Nextera XT"])?;
    write_padded(&mut csv_writer, &["Description"])?;
    write_padded(&mut csv_writer, &["Chemistry", "Amplicon"])?;
    write_padded(&mut csv_writer, &[])?;
    write_padded(&mut csv_writer, &["[Reads]"])?;
    write_padded(&mut csv_writer, &["75"])?;
    write_padded(&mut csv_writer, &["75"])?;
    write_padded(&mut csv_writer, &[])?;
    write_padded(&mut csv_writer, &["[Settings]"])?;
    write_padded(&mut csv_writer, &["ReverseComplement", "0"])?;
    write_padded(&mut csv_writer, &["Adapter", ADAPTER])?;
    write_padded(&mut csv_writer, &[])?;
    write_padded(&mut csv_writer, &["[Data]"])?;
    write_padded(
        &mut csv_writer,
        &[
            "Lane",
            "Sample_ID",
            "Sample_Name",
            "Sample_Plate",
            "Sample_Well",
            "I7_Index_ID",
            "index",
            "I5_Index_ID",
            "index2",
            "Sample_Project",
            "Description",
        ],
    )?;

    for row in rows {
        let lane = row.lane.to_string();
        write_padded(
            &mut csv_writer,
            &[
                lane.as_str(),
                row.sample_id.as_str(),
                row.sample_name.as_str(),
                "",
                "",
                row.i7_index_id.as_str(),
                row.index.as_str(),
                row.i5_index_id.as_str(),
                row.index2.as_str(),
                row.sample_project.as_str(),
                row.description.as_str(),
            ],
        )?;
    }
    csv_writer.flush().context("Failed to flush sample sheet")?;
    Ok(())
}

/// Write the sample sheet for a flowcell into `dir` under the expected
/// filename and return the full path.
///
/// # Errors
/// Fails if the file cannot be created or written.
pub fn write_sample_sheet_file<P: AsRef<Path>>(
    dir: P,
    flowcell_id: &str,
    rows: &[SampleSheetRow],
) -> anyhow::Result<PathBuf> {
    let path = dir.as_ref().join(sheet_filename(flowcell_id));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create sample sheet: {}", path.display()))?;
    write_sample_sheet(file, rows)?;
    info!("Wrote {} sample sheet rows to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LanekitError;
    use crate::model::{Flowcell, Pool, PoolSize, Sequencer};
    use crate::status::RecordStatus;
    use crate::store::tests::{library, sample, seeded_store};
    use crate::store::{MemoryStore, Snapshot};

    /// Two lanes in reverse name order, one member each, plus a withdrawn
    /// member that must not appear.
    fn two_lane_store() -> MemoryStore {
        let mut lib1 = library(1, "BC0002", RecordStatus::OnFlowcell);
        lib1.index_i7 = "ATCACGAC".to_string();
        lib1.index_type = Some(1);
        lib1.request_name = "Müller Request".to_string();
        let lib2 = library(2, "BC0001", RecordStatus::OnFlowcell);
        let withdrawn = library(3, "BC0003", RecordStatus::Withdrawn);

        MemoryStore::from_snapshot(Snapshot {
            pools: vec![
                Pool {
                    id: 1,
                    name: "Pool_A".to_string(),
                    size: PoolSize { id: 1, multiplier: 2 },
                    loaded: 1,
                    library_ids: vec![1, 3],
                    sample_ids: vec![],
                },
                Pool {
                    id: 2,
                    name: "Pool_B".to_string(),
                    size: PoolSize { id: 1, multiplier: 1 },
                    loaded: 1,
                    library_ids: vec![2],
                    sample_ids: vec![],
                },
            ],
            records: vec![lib1, lib2, withdrawn],
            flowcells: vec![Flowcell {
                id: 1,
                flowcell_id: "FC100".to_string(),
                sequencer: 1,
                lane_ids: vec![1, 2],
            }],
            lanes: vec![
                crate::model::Lane {
                    id: 1,
                    name: "Lane 2".to_string(),
                    pool: 1,
                    completed: false,
                    loading_concentration: None,
                    phix: None,
                },
                crate::model::Lane {
                    id: 2,
                    name: "Lane 1".to_string(),
                    pool: 2,
                    completed: false,
                    loading_concentration: None,
                    phix: None,
                },
            ],
            sequencers: vec![Sequencer { id: 1, name: "HiSeq 2000".to_string() }],
            indices_i7: vec![crate::index_lookup::IndexEntry {
                index_id: "A701".to_string(),
                index: "ATCACGAC".to_string(),
                index_type: 1,
            }],
            ..Snapshot::default()
        })
    }

    #[test]
    fn test_rows_resorted_by_lane_number_then_barcode_suffix() {
        let store = two_lane_store();
        let rows = generate(&store, &store.index_lookup(), 1, &[1, 2]).unwrap();

        // Lane ids were given in "Lane 2"-first order; the global resort
        // puts lane 1 first
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].lane, 1);
        assert_eq!(rows[0].sample_id, "BC0001");
        assert_eq!(rows[1].lane, 2);
        assert_eq!(rows[1].sample_id, "BC0002");
    }

    #[test]
    fn test_barcode_suffix_breaks_ties_within_a_lane() {
        let store = MemoryStore::from_snapshot(Snapshot {
            pools: vec![Pool {
                id: 1,
                name: "P".to_string(),
                size: PoolSize { id: 1, multiplier: 1 },
                loaded: 1,
                library_ids: vec![1, 2],
                sample_ids: vec![],
            }],
            records: vec![
                library(1, "LIB0007", RecordStatus::OnFlowcell),
                library(2, "LIB0003", RecordStatus::OnFlowcell),
            ],
            flowcells: vec![Flowcell {
                id: 1,
                flowcell_id: "FC100".to_string(),
                sequencer: 1,
                lane_ids: vec![1],
            }],
            lanes: vec![crate::model::Lane {
                id: 1,
                name: "Lane 1".to_string(),
                pool: 1,
                completed: false,
                loading_concentration: None,
                phix: None,
            }],
            ..Snapshot::default()
        });
        let rows = generate(&store, &IndexLookup::default(), 1, &[1]).unwrap();
        assert_eq!(rows[0].sample_id, "LIB0003");
        assert_eq!(rows[1].sample_id, "LIB0007");
    }

    #[test]
    fn test_withdrawn_members_are_excluded() {
        let store = two_lane_store();
        let rows = generate(&store, &store.index_lookup(), 1, &[1, 2]).unwrap();
        assert!(rows.iter().all(|r| r.sample_id != "BC0003"));
    }

    #[test]
    fn test_index_resolution_and_empty_fallback() {
        let store = two_lane_store();
        let rows = generate(&store, &store.index_lookup(), 1, &[1, 2]).unwrap();

        // BC0002 carries the known I7 sequence, BC0001 carries none
        let resolved = rows.iter().find(|r| r.sample_id == "BC0002").unwrap();
        assert_eq!(resolved.i7_index_id, "A701");
        assert_eq!(resolved.index, "ATCACGAC");
        assert_eq!(resolved.i5_index_id, "");
        assert_eq!(resolved.index2, "");

        let unindexed = rows.iter().find(|r| r.sample_id == "BC0001").unwrap();
        assert_eq!(unindexed.i7_index_id, "");
        assert_eq!(unindexed.index, "");
    }

    #[test]
    fn test_free_text_is_ascii_folded() {
        let store = two_lane_store();
        let rows = generate(&store, &store.index_lookup(), 1, &[1, 2]).unwrap();
        let row = rows.iter().find(|r| r.sample_id == "BC0002").unwrap();
        assert_eq!(row.sample_project, "Muller Request");
    }

    #[test]
    fn test_missing_lane_fails() {
        let store = two_lane_store();
        let result = generate(&store, &store.index_lookup(), 1, &[1, 99]);
        assert!(matches!(result, Err(LanekitError::LaneNotFound { id: 99 })));
    }

    #[test]
    fn test_missing_flowcell_fails() {
        let store = two_lane_store();
        let result = generate(&store, &store.index_lookup(), 9, &[1]);
        assert!(matches!(result, Err(LanekitError::FlowcellNotFound { id: 9 })));
    }

    #[test]
    fn test_samples_follow_libraries_from_the_same_lane() {
        let mut smp = sample(2, "BRC0001", RecordStatus::OnFlowcell);
        smp.read_length = 1;
        let store = MemoryStore::from_snapshot(Snapshot {
            pools: vec![Pool {
                id: 1,
                name: "P".to_string(),
                size: PoolSize { id: 1, multiplier: 1 },
                loaded: 1,
                library_ids: vec![1],
                sample_ids: vec![2],
            }],
            records: vec![library(1, "BRC0002", RecordStatus::OnFlowcell), smp],
            flowcells: vec![Flowcell {
                id: 1,
                flowcell_id: "FC100".to_string(),
                sequencer: 1,
                lane_ids: vec![1],
            }],
            lanes: vec![crate::model::Lane {
                id: 1,
                name: "Lane 1".to_string(),
                pool: 1,
                completed: false,
                loading_concentration: None,
                phix: None,
            }],
            ..Snapshot::default()
        });
        let rows = generate(&store, &IndexLookup::default(), 1, &[1]).unwrap();
        // Both share the suffix-sorted order; the global resort is what
        // decides, not the libraries-first fetch order
        assert_eq!(rows[0].sample_id, "BRC0001");
        assert_eq!(rows[1].sample_id, "BRC0002");
    }

    #[test]
    fn test_written_sheet_layout() {
        let rows = vec![SampleSheetRow {
            lane: 1,
            sample_id: "BC0001".to_string(),
            sample_name: "Library 1".to_string(),
            i7_index_id: "A701".to_string(),
            index: "ATCACGAC".to_string(),
            i5_index_id: String::new(),
            index2: String::new(),
            sample_project: "Request_A".to_string(),
            description: "Quant-seq".to_string(),
        }];
        let mut buffer = Vec::new();
        write_sample_sheet(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert_eq!(lines[0], "[Header],,,,,,,,,,");
        assert_eq!(lines[1], "IEMFileVersion,4,,,,,,,,,");
        assert_eq!(lines[9], "[Reads],,,,,,,,,,");
        assert_eq!(lines[10], "75,,,,,,,,,,");
        assert_eq!(lines[14], "ReverseComplement,0,,,,,,,,,");
        assert_eq!(lines[15], "Adapter,CTGTCTCTTATACACATCT,,,,,,,,,");
        assert_eq!(lines[17], "[Data],,,,,,,,,,");
        assert_eq!(
            lines[18],
            "Lane,Sample_ID,Sample_Name,Sample_Plate,Sample_Well,I7_Index_ID,index,\
             I5_Index_ID,index2,Sample_Project,Description"
        );
        assert_eq!(lines[19], "1,BC0001,Library 1,,,A701,ATCACGAC,,,Request_A,Quant-seq");
        // Every row is padded to the same column count
        assert!(lines[..19].iter().all(|l| l.matches(',').count() == 10));
    }

    #[test]
    fn test_sheet_filename() {
        assert_eq!(sheet_filename("FC100"), "FC100_SampleSheet.csv");
    }
}
