use miette::IntoDiagnostic;
use std::path::{Path, PathBuf};
use tracing::info;

use eworld_engine::finder::EnvelopeFinder;
use eworld_engine::result::RunReport;
use eworld_ir::variables::VariableSpace;
use eworld_smt::backends::smtlib_printer;
use eworld_smt::encoder::encode_world;

use crate::cli::{parse_output_format, OutputFormat, ScenarioArgs};
use crate::commands::load_scenario;

pub(crate) fn run_command(
    args: ScenarioArgs,
    format: &str,
    dump_smt: Option<PathBuf>,
) -> miette::Result<()> {
    let output_format = parse_output_format(format)?;
    let (scenario, options) = load_scenario(&args)?;

    if let Some(path) = dump_smt {
        dump_world_formula(&VariableSpace::new(scenario.dim), &path)?;
    }

    let mut finder = EnvelopeFinder::with_z3(&scenario, &options).into_diagnostic()?;
    let steps = finder.run_all().into_diagnostic()?;
    let report = RunReport::new(&finder, steps);

    match output_format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json().into_diagnostic()?),
    }
    Ok(())
}

fn dump_world_formula(space: &VariableSpace, path: &Path) -> miette::Result<()> {
    let encoding = encode_world(space);
    let script = smtlib_printer::script(space, encoding.num_vars, &encoding.clauses);
    std::fs::write(path, script).into_diagnostic()?;
    info!(
        path = %path.display(),
        clauses = encoding.clauses.len(),
        "wrote world formula"
    );
    Ok(())
}
