use anyhow::{Context, Result};
use clap::Parser;
use springview::config::Args;
use springview::state::Simulator;
use springview::widget;
use std::io::{self, BufWriter, Write};

/// Prints `tick,position,velocity` rows without touching the terminal
fn print_trajectory(args: &Args, ticks: u64) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "tick,position,velocity")?;
    for snapshot in Simulator::new(args.spring_params()).trajectory(ticks) {
        writeln!(
            out,
            "{},{},{}",
            snapshot.tick, snapshot.position, snapshot.velocity
        )?;
    }
    out.flush().context("failed to write trajectory")
}

/// Main function
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{args:?}");

    match args.ticks {
        Some(ticks) => print_trajectory(&args, ticks),
        None => widget::run(&args),
    }
}
