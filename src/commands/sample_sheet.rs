//! Generate the instrument sample sheet for selected lanes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lanekit_lib::model::{FlowcellPk, LaneId};
use lanekit_lib::sample_sheet;
use lanekit_lib::store::Store;

use crate::commands::command::Command;
use crate::commands::common::StoreOptions;

/// Generate the demultiplexing sample sheet for a flowcell's lanes.
#[derive(Debug, Parser)]
#[command(
    name = "sample-sheet",
    about = "\x1b[38;5;110m[EXPORT]\x1b[0m    \x1b[36mGenerate the instrument sample sheet for selected lanes\x1b[0m",
    long_about = r#"
Generate the demultiplexing sample sheet for selected lanes of a flowcell.

One row is emitted per non-withdrawn library or sample in each lane's
pool, with index identifiers resolved against the snapshot's index tables
and free-text fields folded to ASCII. Rows are ordered by lane number,
then by barcode suffix. The sheet is written to
<output-dir>/<flowcell_id>_SampleSheet.csv.

EXAMPLES:

  lanekit sample-sheet -s store.json -f 1 -l 2,3 -O runs/
"#
)]
pub struct SampleSheet {
    #[command(flatten)]
    pub store: StoreOptions,

    /// Primary key of the flowcell being exported
    #[arg(short = 'f', long = "flowcell")]
    pub flowcell: FlowcellPk,

    /// Lane ids to include (comma-separated or repeated)
    #[arg(short = 'l', long = "lanes", value_delimiter = ',', required = true)]
    pub lanes: Vec<LaneId>,

    /// Directory the sheet is written into
    #[arg(short = 'O', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

impl Command for SampleSheet {
    fn execute(&self) -> Result<()> {
        let store = self.store.load()?;
        let lookup = store.index_lookup();
        let rows = sample_sheet::generate(&store, &lookup, self.flowcell, &self.lanes)?;
        let flowcell = store.flowcell(self.flowcell)?;
        sample_sheet::write_sample_sheet_file(&self.output_dir, &flowcell.flowcell_id, &rows)?;
        Ok(())
    }
}
