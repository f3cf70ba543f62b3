use super::{CliError, GlobalArgs};
use anyhow::Context;
use atomconv_core::domain::{ConvertError, ConvertRequest};
use atomconv_core::modules::filter::{GrotrianOptions, OptionToken, OptionTokenError};
use atomconv_core::modules::serialization::write_text_artifact;
use atomconv_core::modules::Converter;
use std::io::{self, Write};
use tracing::{info, warn};

/// Folds trailing `key=value` tokens into options. Unknown tokens are ignored
/// with a warning, malformed numbers abort the run. `accept` lets a command
/// drop tokens it has no use for.
pub(super) fn grotrian_options(
    tokens: &[String],
    accept: impl Fn(&OptionToken) -> bool,
) -> Result<GrotrianOptions, CliError> {
    let mut options = GrotrianOptions::default();

    for token in tokens {
        match token.parse::<OptionToken>() {
            Ok(parsed) => {
                if accept(&parsed) {
                    options.apply(parsed);
                }
            }
            Err(error @ OptionTokenError::InvalidNumber(_)) => {
                return Err(CliError::Usage(error.to_string()));
            }
            Err(error) => warn!("ignoring option: {error}"),
        }
    }

    Ok(options)
}

pub(super) fn run_converter(
    converter: &dyn Converter,
    request: &ConvertRequest,
    global: &GlobalArgs,
) -> Result<i32, CliError> {
    info!(
        dialect = %converter.dialect(),
        input = %request.input_path.display(),
        "starting conversion"
    );
    let output = converter.convert(request).map_err(CliError::Compute)?;

    match output.destination(request) {
        _ if output.artifact.is_empty() => info!("no artifact produced"),
        Some(path) => {
            write_text_artifact(&path, &output.artifact).map_err(|error| {
                CliError::Compute(ConvertError::io_system(
                    "IO.OUTPUT_WRITE",
                    format!("failed to write output file '{}': {}", path.display(), error),
                ))
            })?;
            info!("wrote {}", path.display());
        }
        None => {
            io::stdout()
                .lock()
                .write_all(output.artifact.as_bytes())
                .context("failed to write artifact to standard output")?;
        }
    }

    if let Some(listing) = &output.listing {
        io::stdout()
            .lock()
            .write_all(listing.as_bytes())
            .context("failed to write level listing to standard output")?;
    }

    if let Some(report_path) = &global.report {
        output
            .report
            .write_json(report_path)
            .map_err(CliError::Compute)?;
        info!("wrote run report {}", report_path.display());
    }

    Ok(0)
}
