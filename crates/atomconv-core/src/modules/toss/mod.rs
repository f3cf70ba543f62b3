//! TOSS level and transition tables to WRPLOT Grotrian diagrams.

mod parser;
mod table;

pub use parser::TossRow;
pub use table::{TableEndpoint, TableRow, render_table};

use super::filter::GrotrianOptions;
use super::grotrian::{DiagramStyle, GrotrianInput, draw};
use super::helpers::{maybe_read_optional_input_source, read_input_source};
use super::report::{ConversionReport, Diagnostics};
use super::traits::{ConversionOutput, Converter};
use crate::domain::{ConvertError, ConvertRequest, ConvertResult, Dialect};
use tracing::info;

use parser::{parse_levels, parse_transitions};

#[derive(Debug, Clone, PartialEq)]
pub struct TossConverter {
    pub ionization_limit: f64,
    pub options: GrotrianOptions,
}

impl TossConverter {
    pub fn new(ionization_limit: f64, options: GrotrianOptions) -> Self {
        Self {
            ionization_limit,
            options,
        }
    }
}

impl Converter for TossConverter {
    fn dialect(&self) -> Dialect {
        Dialect::Toss
    }

    fn convert(&self, request: &ConvertRequest) -> ConvertResult<ConversionOutput> {
        let level_source = read_input_source(Dialect::Toss, &request.input_path, "level")?;

        let mut diagnostics = Diagnostics::new();
        let parsed = parse_levels(&level_source, &self.options.filter, &mut diagnostics);
        if parsed.levels.is_empty() {
            return Err(ConvertError::computation(
                "RUN.NO_LEVELS",
                format!(
                    "found no levels in TOSS level file '{}'",
                    request.input_path.display()
                ),
            ));
        }

        let mut report = ConversionReport::new(Dialect::Toss).with_input(&request.input_path);
        let transitions = match &self.options.line_file {
            Some(path) => {
                report = report.with_input(path);
                match maybe_read_optional_input_source(path, "line") {
                    Some(line_source) => {
                        parse_transitions(&line_source, &parsed.levels, &mut diagnostics)
                    }
                    None => Default::default(),
                }
            }
            None => {
                info!("no line file given, diagram has no connecting lines");
                Default::default()
            }
        };

        report.levels_accepted = parsed.levels.len();
        report.levels_filtered = parsed.filtered;
        report.transitions = transitions.transitions.len();
        report.transitions_swapped = transitions.swapped;
        report.absorb(diagnostics);

        let input = GrotrianInput {
            source_label: request.source_label(),
            ionization_limit: self.ionization_limit,
            column_offset: self.options.column_offset,
            levels: parsed.levels,
            transitions: transitions.transitions,
        };
        let diagram = draw(&input, &DiagramStyle::TOSS).ok_or_else(|| {
            ConvertError::internal("SYS.LAYOUT", "layout unavailable for a non-empty level table")
        })?;

        info!(
            levels = diagram.levels,
            lines = diagram.transitions,
            top_labels = diagram.top_labels,
            "TOSS Grotrian diagram complete"
        );
        report.top_labels = diagram.top_labels;
        Ok(ConversionOutput::new(diagram.text, report))
    }
}
