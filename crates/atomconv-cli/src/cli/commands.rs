use super::helpers::{grotrian_options, run_converter};
use super::{CliError, GlobalArgs};
use atomconv_core::domain::{ConvertRequest, Dialect};
use atomconv_core::modules::filter::OptionToken;
use atomconv_core::modules::{
    AdamantConverter, FplotConverter, NistConverter, TmadConverter, TossConverter,
};
use std::path::PathBuf;
use tracing::warn;

#[derive(clap::Args)]
pub(super) struct AdamantArgs {
    /// ADAMANT level file
    #[arg(value_name = "level-file")]
    levels: PathBuf,

    /// ADAMANT line file
    #[arg(value_name = "line-file")]
    lines: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct NistArgs {
    /// NIST ASD line listing, pipe separated
    #[arg(value_name = "nist-file")]
    file: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct TmadArgs {
    /// TMAD model atom
    #[arg(value_name = "TMAD file")]
    file: PathBuf,

    /// Level filters: e=<number>, n=<number>, l=<number>, c=<Term><parity>
    #[arg(value_name = "options")]
    options: Vec<String>,
}

#[derive(clap::Args)]
pub(super) struct TossArgs {
    /// TOSS level file
    #[arg(value_name = "levels file")]
    levels: PathBuf,

    /// Ionization limit in cm^-1
    #[arg(value_name = "ionlimit", allow_negative_numbers = true)]
    ionization_limit: f64,

    /// lf=<file>, off=<number> and the level filters e=, n=, l=, c=
    #[arg(value_name = "options")]
    options: Vec<String>,
}

#[derive(clap::Args)]
pub(super) struct FplotArgs {
    /// TOSS transition table
    #[arg(value_name = "filename")]
    file: PathBuf,

    /// Factor applied to every ident length
    #[arg(value_name = "scalefactor", allow_negative_numbers = true)]
    scale: Option<f64>,

    /// Ident lengths in plot units instead of cm
    #[arg(
        value_name = "u",
        action = clap::ArgAction::Set,
        value_parser = clap::value_parser!(bool)
    )]
    units: Option<bool>,
}

fn request(dialect: Dialect, input: PathBuf, global: &GlobalArgs) -> ConvertRequest {
    let request = ConvertRequest::new(dialect, input);
    match &global.output {
        Some(path) => request.with_output(path),
        None => request,
    }
}

pub(super) fn run_adamant_command(args: AdamantArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let converter = AdamantConverter::new(args.lines);
    run_converter(&converter, &request(Dialect::Adamant, args.levels, global), global)
}

pub(super) fn run_nist_command(args: NistArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    run_converter(&NistConverter, &request(Dialect::Nist, args.file, global), global)
}

pub(super) fn run_tmad_command(args: TmadArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let options = grotrian_options(&args.options, |token| match token {
        OptionToken::ColumnOffset(_) | OptionToken::LineFile(_) => {
            warn!("option '{}' has no effect on TMAD diagrams", token_name(token));
            false
        }
        _ => true,
    })?;
    let converter = TmadConverter::new(options.filter);
    run_converter(&converter, &request(Dialect::Tmad, args.file, global), global)
}

pub(super) fn run_toss_command(args: TossArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let options = grotrian_options(&args.options, |_| true)?;
    let converter = TossConverter::new(args.ionization_limit, options);
    run_converter(&converter, &request(Dialect::Toss, args.levels, global), global)
}

pub(super) fn run_fplot_command(args: FplotArgs, global: &GlobalArgs) -> Result<i32, CliError> {
    let defaults = FplotConverter::default();
    let converter = FplotConverter {
        scale: args.scale.unwrap_or(defaults.scale),
        units: args.units.unwrap_or(defaults.units),
    };
    run_converter(&converter, &request(Dialect::TossFplot, args.file, global), global)
}

fn token_name(token: &OptionToken) -> &'static str {
    match token {
        OptionToken::MaxEnergy(_) => "e",
        OptionToken::MaxN(_) => "n",
        OptionToken::MaxL(_) => "l",
        OptionToken::ExcludeTerm(_) => "c",
        OptionToken::ColumnOffset(_) => "off",
        OptionToken::LineFile(_) => "lf",
    }
}
