#![deny(unsafe_code)]
pub mod commands;
mod version;

use anyhow::Result;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());
use commands::benchtop::Benchtop;
use commands::command::Command;
use commands::lanes::Lanes;
use commands::load::Load;
use commands::pools::Pools;
use commands::sample_sheet::SampleSheet;
use enum_dispatch::enum_dispatch;
use env_logger::Env;
use log::info;

#[derive(Parser, Debug)]
#[command(styles = STYLES, version = version::VERSION)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[enum_dispatch(Command)]
#[derive(Parser, Debug)]
#[command(version = version::VERSION)]
enum Subcommand {
    // Readiness
    #[command(display_order = 1)]
    Pools(Pools),
    #[command(display_order = 2)]
    Lanes(Lanes),

    // Loading
    #[command(display_order = 3)]
    Load(Load),

    // Exports
    #[command(display_order = 4)]
    SampleSheet(SampleSheet),
    #[command(display_order = 5)]
    Benchtop(Benchtop),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Running lanekit version {}", version::VERSION);
    args.subcommand.execute()
}
