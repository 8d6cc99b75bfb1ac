pub(crate) mod check;
pub(crate) mod run;

use miette::IntoDiagnostic;

use eworld_engine::finder::FinderOptions;
use eworld_engine::loader::Scenario;
use eworld_ir::grid::Dimension;

use crate::cli::ScenarioArgs;

/// Load the scenario files and turn the flags into engine options.
pub(crate) fn load_scenario(args: &ScenarioArgs) -> miette::Result<(Scenario, FinderOptions)> {
    let dim = Dimension::new(args.dim).into_diagnostic()?;
    let scenario =
        Scenario::load(dim, &args.steps, &args.envelopes, args.num_steps).into_diagnostic()?;
    let options = FinderOptions {
        timeout_secs: args.timeout,
    };
    Ok((scenario, options))
}
