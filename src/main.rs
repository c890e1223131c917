//! CLI entry point for the polyomino packing solver

use clap::Parser;
use shapefit::io::cli::{Cli, Runner};
use shapefit::io::logging;

// Allow print for the final answer on stdout
#[allow(clippy::print_stdout)]
fn main() -> shapefit::Result<()> {
    let cli = Cli::parse();
    let level = cli.log_level();
    let mut runner = Runner::new(cli);
    logging::init(
        level,
        runner.progress_manager().map(|pm| pm.multi_progress().clone()),
    )?;

    let feasible = runner.run()?;
    println!("{feasible}");
    Ok(())
}
