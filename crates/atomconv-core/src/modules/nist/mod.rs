//! NIST ASD line listings to a TOSS transition table plus a level listing.

mod parser;

use super::helpers::read_input_source;
use super::report::{ConversionReport, Diagnostics, SkipKind};
use super::toss::{TableEndpoint, TableRow, render_table};
use super::traits::{ConversionOutput, Converter};
use crate::domain::{ConvertRequest, ConvertResult, Dialect, Level, compare_by_energy};
use crate::modules::serialization::format_fixed_f64;
use crate::parser::source_lines;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use parser::{NistRow, RowOutcome, parse_row};

pub const OUTPUT_SUFFIX: &str = "_out_toss";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NistConverter;

/// `<input>_out_toss`, next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

fn endpoint(level: &Level) -> TableEndpoint<'_> {
    TableEndpoint {
        energy: level.energy,
        parity: level.parity.marker(),
        j: level.j,
    }
}

/// Endpoint levels ordered by energy with repeated energies collapsed.
fn unique_levels(rows: &[NistRow]) -> Vec<&Level> {
    let mut levels: Vec<&Level> = rows
        .iter()
        .flat_map(|row| [&row.lower, &row.upper])
        .collect();
    levels.sort_by(|lhs, rhs| compare_by_energy(lhs, rhs));
    levels.dedup_by(|next, kept| next.energy == kept.energy);
    levels
}

fn render_listing(levels: &[&Level]) -> String {
    levels
        .iter()
        .map(|level| {
            format!(
                "{}: {} {} ({}) {:.1}\n",
                format_fixed_f64(level.energy, 9, 2),
                level.configuration,
                level.term,
                level.parity.marker(),
                level.j
            )
        })
        .collect()
}

impl Converter for NistConverter {
    fn dialect(&self) -> Dialect {
        Dialect::Nist
    }

    fn convert(&self, request: &ConvertRequest) -> ConvertResult<ConversionOutput> {
        let source = read_input_source(Dialect::Nist, &request.input_path, "line")?;

        let mut diagnostics = Diagnostics::new();
        let mut rows = Vec::new();
        let mut swapped = 0;

        for line in source_lines(&source) {
            if line.is_blank() {
                continue;
            }
            match parse_row(line.raw) {
                RowOutcome::Complete(mut row) => {
                    if row.lower.energy > row.upper.energy {
                        std::mem::swap(&mut row.lower, &mut row.upper);
                        swapped += 1;
                        warn!(
                            line = line.number,
                            "levels reversed, check gA/gf for consistency"
                        );
                    }
                    rows.push(row);
                }
                RowOutcome::Ignored => debug!(line = line.number, "no transition on line"),
                RowOutcome::Rejected(reason) => {
                    diagnostics.skip(SkipKind::Transition, &line, reason);
                }
            }
        }
        info!("{} transitions found", rows.len());

        let artifact = render_table(
            rows.iter().map(|row| TableRow {
                wavelength: row.wavelength,
                lower: endpoint(&row.lower),
                upper: endpoint(&row.upper),
                log_gf: row.log_gf,
                g_a: row.g_a,
            }),
            true,
        );

        let levels = unique_levels(&rows);
        info!(
            levels = rows.len() * 2,
            unique = levels.len(),
            "collected endpoint levels"
        );
        let listing = render_listing(&levels);

        let mut report = ConversionReport::new(Dialect::Nist).with_input(&request.input_path);
        report.levels_accepted = levels.len();
        report.transitions = rows.len();
        report.transitions_swapped = swapped;
        report.absorb(diagnostics);

        Ok(ConversionOutput::new(artifact, report)
            .with_default_path(default_output_path(&request.input_path))
            .with_listing(listing))
    }
}
