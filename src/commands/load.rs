//! Assign pools to the lanes of a new flowcell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lanekit_lib::assignment::{self, AssignmentRequest};
use log::info;

use crate::commands::command::Command;
use crate::commands::common::StoreOptions;

/// Create a flowcell and bind pools to its lanes.
///
/// Applies the whole assignment atomically: the flowcell and lanes are
/// created, each touched pool's loaded count is set to the number of lanes
/// referencing it in this request, and every member of each touched pool is
/// advanced to the loaded stage. On any failure the store file is left
/// untouched.
#[derive(Debug, Parser)]
#[command(
    name = "load",
    about = "\x1b[38;5;173m[LOADING]\x1b[0m   \x1b[36mAssign pools to the lanes of a new flowcell\x1b[0m",
    long_about = r#"
Create a flowcell and bind pools to its lanes.

The request file is JSON:

  {
    "flowcell": { "flowcell_id": "FC100", "sequencer": 1 },
    "lanes": [
      { "lane_name": "Lane 1", "pool_id": 3 },
      { "lane_name": "Lane 2", "pool_id": 3 }
    ]
  }

The assignment is all-or-nothing. On success the store file is rewritten
with the new flowcell, its lanes, the per-pool loaded counts, and every
member of each touched pool at the loaded stage.

EXAMPLES:

  lanekit load -s store.json -r request.json
"#
)]
pub struct Load {
    #[command(flatten)]
    pub store: StoreOptions,

    /// JSON assignment request file
    #[arg(short = 'r', long = "request")]
    pub request: PathBuf,
}

impl Command for Load {
    fn execute(&self) -> Result<()> {
        let store = self.store.load()?;

        let text = std::fs::read_to_string(&self.request)
            .with_context(|| format!("Failed to read request file: {}", self.request.display()))?;
        let request: AssignmentRequest = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse request file: {}", self.request.display()))?;

        let flowcell = assignment::assign(&store, &request.flowcell, &request.lanes)?;
        store.save(&self.store.store)?;
        info!(
            "Assigned {} lanes on flowcell {} (pk {})",
            request.lanes.len(),
            request.flowcell.flowcell_id,
            flowcell
        );
        Ok(())
    }
}
