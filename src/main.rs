use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

mod boundary;
mod check;
mod cli;
mod collect;
mod config;
mod freshness;
mod gateway;
mod logging;

use check::{render_error, run_check, Report, EXIT_INTERNAL_ERROR, EXIT_STALE};
use cli::RootArgs;
use config::{required_inputs, RequiredInputs, Settings};
use freshness::Verdict;
use gateway::GoListGateway;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    logging::init(args.verbose);

    let required = match required_inputs(&args) {
        Ok(required) => required,
        Err(missing) => {
            println!("{}", missing.join(", "));
            println!("{}", RootArgs::command().render_help());
            return ExitCode::from(EXIT_STALE);
        }
    };

    match run(&args, required) {
        Ok(report) => {
            println!("{}", report.message);
            ExitCode::from(report.exit_code)
        }
        Err(err) => {
            println!("{}", render_error(&err));
            ExitCode::from(EXIT_INTERNAL_ERROR)
        }
    }
}

fn run(args: &RootArgs, required: RequiredInputs) -> Result<Report> {
    // A missing binary needs neither the go tool nor a source root.
    if !freshness::binary_exists(&required.binary)? {
        return Ok(Report::new(&required.binary, &Verdict::BinaryAbsent));
    }
    let settings = Settings::resolve(args, required)?;
    let gateway = GoListGateway::new(settings.go_command.clone(), settings.import_scope);
    let verdict = run_check(&settings, &gateway)?;
    Ok(Report::new(&settings.binary, &verdict))
}
