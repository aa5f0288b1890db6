mod cli;
mod logging;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use imgstamp_build::{BuildError, BuildOutcome, Orchestrator, ProcessRunner};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ログは stderr、エンジンの出力はそのまま継承
    logging::init(cli.verbose);

    match run(cli) {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<BuildError>() {
            Some(build_err) if build_err.is_command_failure() => {
                tracing::error!("Process aborted due to error running Docker commands");
                exit_code(build_err.exit_code())
            }
            Some(build_err) => {
                eprintln!("{} {}", "✗".red(), build_err.user_message());
                eprintln!("Error: {:?}", err);
                ExitCode::FAILURE
            }
            None => {
                eprintln!("Error: {:?}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<BuildOutcome> {
    let (request, engine) = cli.into_request()?;
    tracing::debug!("Build request: {:?}", request);

    let orchestrator = Orchestrator::new(request, engine, ProcessRunner);
    Ok(orchestrator.run()?)
}

fn print_summary(outcome: &BuildOutcome) {
    let suffix = if outcome.pushed { " and pushed" } else { "" };
    println!(
        "{} built{} {}",
        "✓".green(),
        suffix,
        outcome.primary.to_string().cyan()
    );
    if let Some(latest) = &outcome.latest {
        println!("{} tagged{} {}", "✓".green(), suffix, latest.to_string().cyan());
    }
}

fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) if code != 0 => ExitCode::from(code),
        _ => ExitCode::FAILURE,
    }
}
