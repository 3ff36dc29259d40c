//! List active lanes across all flowcells.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lanekit_lib::readiness;
use log::info;

use crate::commands::command::Command;
use crate::commands::common::{StoreOptions, write_json};

/// List every non-completed lane with its pool's display flags.
#[derive(Debug, Parser)]
#[command(
    name = "lanes",
    about = "\x1b[38;5;72m[READINESS]\x1b[0m \x1b[36mList active lanes across all flowcells\x1b[0m",
    long_about = r#"
List every non-completed lane across all flowcells, as JSON.

Each entry carries the lane's flowcell and sequencer context, the pool's
read length, and the pool-level display flags (index presence, equal
representation of nucleotides). Lanes whose pool has no members are
skipped. Entries are ordered by flowcell id, then lane name.

EXAMPLES:

  lanekit lanes -s store.json
  lanekit lanes -s store.json -o lanes.json
"#
)]
pub struct Lanes {
    #[command(flatten)]
    pub store: StoreOptions,

    /// Output JSON file (stdout when omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl Command for Lanes {
    fn execute(&self) -> Result<()> {
        let store = self.store.load()?;
        let summaries = readiness::active_lanes(&store)?;
        write_json(self.output.as_ref(), &summaries)?;
        info!("Listed {} active lanes", summaries.len());
        Ok(())
    }
}
