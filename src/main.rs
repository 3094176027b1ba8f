//! payments-client: command-line access to the payment API
//!
//! Entry point for the payments-client application.

use payments_client::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{Outcome, api_hint, report_config_error, setup_tracing};
use run::RunError;

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Command::Init { output } = &cli.command {
        return handle_init(output).into();
    }

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e);
            return Outcome::Usage.into();
        }
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_application(cli.command, config).into()
}

/// Writes the configuration template.
fn handle_init(output: &std::path::Path) -> Outcome {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            Outcome::Success
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Outcome::Usage
        }
    }
}

/// Runs the subcommand and reports its result.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(command: Command, config: ValidatedConfig) -> Outcome {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return Outcome::Rejected;
        }
    };

    match runtime.block_on(run::execute(command, config)) {
        Ok(output) => {
            println!("{output}");
            Outcome::Success
        }
        Err(err) => {
            match &err {
                RunError::Config(e) => report_config_error(e),
                RunError::Api(e) => {
                    eprintln!("{}", run::render_api_error(e));
                    if let Some(hint) = api_hint(e.error_type()) {
                        eprintln!("\n{hint}");
                    }
                }
                RunError::Webhook(_) | RunError::Render(_) => tracing::error!("{err}"),
            }
            Outcome::of(&err)
        }
    }
}
