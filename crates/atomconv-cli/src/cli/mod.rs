mod commands;
mod dispatch;
mod helpers;

use atomconv_core::domain::ConvertError;
use clap::Parser;
use dispatch::{command_alias_from_program_name, converter_command_spec, legacy_usage};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "atomconv".to_string());
    let remaining: Vec<String> = args.collect();

    match run_with_program_name(&program_name, remaining) {
        Ok(code) => code,
        Err(error) => {
            let compatibility_error = error.as_convert_error();
            eprintln!("{}", compatibility_error.diagnostic_line());
            eprintln!("{}", compatibility_error.fatal_exit_line());
            compatibility_error.exit_code()
        }
    }
}

fn run_with_program_name(program_name: &str, args: Vec<String>) -> Result<i32, CliError> {
    let alias = command_alias_from_program_name(program_name);
    let full_args = std::iter::once("atomconv".to_string())
        .chain(alias.map(str::to_string))
        .chain(args)
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(&cli.global);
            dispatch_parsed(cli.command, &cli.global)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp
            | clap::error::ErrorKind::DisplayVersion
            | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{}", err);
                Ok(0)
            }
            clap::error::ErrorKind::MissingRequiredArgument => {
                match args.get(1).and_then(|command| converter_command_spec(command)) {
                    Some(spec) => print!("{}", legacy_usage(spec)),
                    None => print!("{}", err),
                }
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// `-q`/`-v` win over `RUST_LOG`; without either the environment decides,
/// falling back to `info`.
fn init_tracing(global: &GlobalArgs) {
    let filter = if global.quiet {
        EnvFilter::new("warn")
    } else if global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "atomconv",
    about = "Atomic level and line table converters",
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Args)]
pub(crate) struct GlobalArgs {
    /// Write the artifact to this file instead of the default destination
    #[arg(short, long, global = true, value_name = "path")]
    output: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long, global = true, value_name = "path")]
    report: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log skipped and ignored lines as well
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Convert ADAMANT level and line lists into a TOSS transition table
    AdamantToToss(commands::AdamantArgs),
    /// Convert a NIST ASD line listing into a TOSS transition table
    NistToToss(commands::NistArgs),
    /// Draw a WRPLOT Grotrian diagram from a TMAD model atom
    TmadToGrotrian(commands::TmadArgs),
    /// Draw a WRPLOT Grotrian diagram from TOSS level and line tables
    TossToGrotrian(commands::TossArgs),
    /// Turn TOSS lines into WRPLOT idents for an f over wavelength plot
    TossToFplot(commands::FplotArgs),
}

fn dispatch_parsed(command: CliCommand, global: &GlobalArgs) -> Result<i32, CliError> {
    match command {
        CliCommand::AdamantToToss(args) => commands::run_adamant_command(args, global),
        CliCommand::NistToToss(args) => commands::run_nist_command(args, global),
        CliCommand::TmadToGrotrian(args) => commands::run_tmad_command(args, global),
        CliCommand::TossToGrotrian(args) => commands::run_toss_command(args, global),
        CliCommand::TossToFplot(args) => commands::run_fplot_command(args, global),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ConvertError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_convert_error(&self) -> ConvertError {
        match self {
            Self::Usage(message) => {
                ConvertError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => ConvertError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, CliError};
    use atomconv_core::domain::ConvertError;
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "atomconv",
            "nist-to-toss",
            "lines.nist",
            "-o",
            "table.toss",
            "-q",
        ])
        .expect("arguments should parse");
        assert!(cli.global.quiet);
        assert_eq!(
            cli.global.output.as_deref(),
            Some(std::path::Path::new("table.toss"))
        );
    }

    #[test]
    fn errors_keep_their_exit_codes() {
        let usage = CliError::Usage("bad".to_string()).as_convert_error();
        assert_eq!(usage.exit_code(), 2);

        let compute =
            CliError::Compute(ConvertError::computation("RUN.NO_LEVELS", "no levels"));
        assert_eq!(compute.as_convert_error().exit_code(), 4);
        assert_eq!(compute.as_convert_error().code(), "RUN.NO_LEVELS");
    }
}
