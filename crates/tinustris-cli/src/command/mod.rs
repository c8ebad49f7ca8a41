use clap::{Parser, Subcommand};

use self::{curve::CurveArg, simulate::SimulateArg};

mod curve;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a game frame by frame without a display
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the timing values of a rule preset per level
    Curve(#[clap(flatten)] CurveArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Curve(arg) => curve::run(&arg)?,
    }
    Ok(())
}
