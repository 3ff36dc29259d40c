//! Generate the benchtop loading protocol for selected lanes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lanekit_lib::benchtop;
use lanekit_lib::model::LaneId;

use crate::commands::command::Command;
use crate::commands::common::StoreOptions;

/// Generate the benchtop loading protocol for selected lanes.
#[derive(Debug, Parser)]
#[command(
    name = "benchtop",
    about = "\x1b[38;5;110m[EXPORT]\x1b[0m    \x1b[36mGenerate the benchtop loading protocol for selected lanes\x1b[0m",
    long_about = r#"
Generate the benchtop loading protocol: one summary row per selected
lane, ordered by lane name, with the pool, flowcell and sequencer
context, the equal-representation flag over the pool's non-withdrawn
members, the read length, and the lane's loading concentration and PhiX
percentage. The protocol is written to
<output-dir>/FC_Loading_Benchtop_Protocol.xls.

EXAMPLES:

  lanekit benchtop -s store.json -l 2,3 -O runs/
"#
)]
pub struct Benchtop {
    #[command(flatten)]
    pub store: StoreOptions,

    /// Lane ids to include (comma-separated or repeated)
    #[arg(short = 'l', long = "lanes", value_delimiter = ',', required = true)]
    pub lanes: Vec<LaneId>,

    /// Directory the protocol is written into
    #[arg(short = 'O', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

impl Command for Benchtop {
    fn execute(&self) -> Result<()> {
        let store = self.store.load()?;
        let rows = benchtop::generate(&store, &self.lanes)?;
        benchtop::write_benchtop_file(&self.output_dir, &rows)?;
        Ok(())
    }
}
