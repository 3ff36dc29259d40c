//! List pools eligible for flowcell loading.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lanekit_lib::readiness;
use log::info;

use crate::commands::command::Command;
use crate::commands::common::{StoreOptions, write_json};

/// List the pools that can be offered for lane loading.
///
/// A pool is listed once every library has passed quality control, every
/// sample has finished library preparation, and the pool still has lane
/// capacity left. Pools without any members are skipped.
#[derive(Debug, Parser)]
#[command(
    name = "pools",
    about = "\x1b[38;5;72m[READINESS]\x1b[0m \x1b[36mList pools eligible for flowcell loading\x1b[0m",
    long_about = r#"
List the pools that can be offered for lane loading, as JSON.

A pool appears in the listing when:

  - every library member has reached the pooling-ready stage,
  - every sample member has finished library preparation (one stage later),
  - the number of loaded lanes is below the pool's size multiplier.

Pools with no members at all are skipped entirely.

EXAMPLES:

  # Print eligible pools to stdout
  lanekit pools -s store.json

  # Write them to a file
  lanekit pools -s store.json -o pools.json
"#
)]
pub struct Pools {
    #[command(flatten)]
    pub store: StoreOptions,

    /// Output JSON file (stdout when omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl Command for Pools {
    fn execute(&self) -> Result<()> {
        let store = self.store.load()?;
        let candidates = readiness::eligible_pools(&store)?;
        write_json(self.output.as_ref(), &candidates)?;
        info!("Listed {} eligible pools", candidates.len());
        Ok(())
    }
}
