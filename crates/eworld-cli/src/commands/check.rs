use miette::IntoDiagnostic;
use std::path::PathBuf;

use eworld_engine::finder::EnvelopeFinder;
use eworld_engine::loader::load_snapshots;
use eworld_engine::result::compare_snapshots;

use crate::cli::ScenarioArgs;
use crate::commands::load_scenario;

pub(crate) fn check_command(args: ScenarioArgs, states: PathBuf) -> miette::Result<()> {
    let (scenario, options) = load_scenario(&args)?;
    let expected = load_snapshots(scenario.dim, &states).into_diagnostic()?;

    let mut finder = EnvelopeFinder::with_z3(&scenario, &options).into_diagnostic()?;
    let reports = finder.run_all().into_diagnostic()?;
    let mismatches = compare_snapshots(&reports, &expected);

    if mismatches.is_empty() {
        println!("All {} steps match {}.", reports.len(), states.display());
        return Ok(());
    }
    for mismatch in &mismatches {
        println!("{mismatch}");
    }
    Err(miette::miette!(
        "{} of {} steps differ from {}",
        mismatches.len(),
        reports.len().max(expected.len()),
        states.display()
    ))
}
