//! TOSS transition tables to WRPLOT idents for f-value over wavelength plots.

use super::helpers::read_input_source;
use super::report::{ConversionReport, Diagnostics, SkipKind};
use super::toss::TossRow;
use super::traits::{ConversionOutput, Converter};
use crate::common::constants::{OSCILLATOR_DEVIATION_LIMIT, OSCILLATOR_RATE_FACTOR};
use crate::domain::{ConvertRequest, ConvertResult, Dialect};
use crate::parser::source_lines;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FplotConverter {
    pub scale: f64,
    /// Ident lengths in plot units (`U`) instead of centimetres.
    pub units: bool,
}

impl Default for FplotConverter {
    fn default() -> Self {
        Self {
            scale: 1.0,
            units: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ident {
    wavelength: f64,
    f_value: f64,
    log_gf: f64,
}

/// Oscillator strength from log gf, and the one implied by gA.
fn oscillator_strengths(row: &TossRow) -> (f64, f64, f64) {
    let g_lower = (2.0 * row.lower_j + 1.0).trunc();
    let from_log_gf = 10f64.powf(row.log_gf) / g_lower;
    let from_g_a = row.g_a * OSCILLATOR_RATE_FACTOR * row.wavelength * row.wavelength / g_lower;
    (g_lower, from_log_gf, from_g_a)
}

impl Converter for FplotConverter {
    fn dialect(&self) -> Dialect {
        Dialect::TossFplot
    }

    fn convert(&self, request: &ConvertRequest) -> ConvertResult<ConversionOutput> {
        info!(scale = self.scale, units = if self.units { "U" } else { "cm" }, "ident lengths");
        let source = read_input_source(Dialect::TossFplot, &request.input_path, "TOSS line")?;

        let mut diagnostics = Diagnostics::new();
        let mut deviating = 0;
        let mut idents = Vec::new();
        for line in source_lines(&source) {
            let Some(row) = TossRow::parse(line.raw) else {
                debug!(line = line.number, "not a transition row");
                continue;
            };

            let (g_lower, f_value, f_from_g_a) = oscillator_strengths(&row);
            let ratio = f_value / f_from_g_a;
            let deviation = (1.0 - ratio).abs();
            if deviation > OSCILLATOR_DEVIATION_LIMIT {
                deviating += 1;
                diagnostics.skip(
                    SkipKind::Line,
                    &line,
                    format!(
                        "deviating f-value/gA: wvl {:.4} gA {:.4} f {:.4} f2 {:.4} ratio {:.4} diff {:.4} jlow {:.4} glow {}",
                        row.wavelength,
                        row.g_a,
                        f_value,
                        f_from_g_a,
                        ratio,
                        deviation,
                        row.lower_j,
                        g_lower
                    ),
                );
                continue;
            }

            idents.push(Ident {
                wavelength: row.wavelength,
                f_value,
                log_gf: row.log_gf,
            });
        }

        idents.sort_by(|lhs, rhs| {
            lhs.wavelength
                .total_cmp(&rhs.wavelength)
                .then_with(|| lhs.f_value.total_cmp(&rhs.f_value))
        });

        let suffix = if self.units { "U" } else { "" };
        let mut artifact = String::new();
        for ident in &idents {
            artifact.push_str(&format!(
                "\\IDLENG {:.4}{}\n\\IDENT  {:.4}    {:.6}\n",
                ident.f_value * self.scale,
                suffix,
                ident.wavelength,
                ident.log_gf
            ));
        }

        info!(idents = idents.len(), deviating, "f-value idents complete");

        let mut report = ConversionReport::new(Dialect::TossFplot).with_input(&request.input_path);
        report.transitions = idents.len();
        report.deviating_lines = deviating;
        report.absorb(diagnostics);
        Ok(ConversionOutput::new(artifact, report))
    }
}
