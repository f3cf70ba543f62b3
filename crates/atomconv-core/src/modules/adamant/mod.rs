//! ADAMANT level and line lists to a TOSS transition table.

mod parser;

use super::helpers::read_input_source;
use super::report::{ConversionReport, Diagnostics};
use super::toss::{TableEndpoint, TableRow, render_table};
use super::traits::{ConversionOutput, Converter};
use crate::domain::{ConvertRequest, ConvertResult, Dialect};
use std::path::PathBuf;
use tracing::info;

use parser::{parse_levels, parse_lines};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdamantConverter {
    pub line_file: PathBuf,
}

impl AdamantConverter {
    pub fn new(line_file: impl Into<PathBuf>) -> Self {
        Self {
            line_file: line_file.into(),
        }
    }
}

impl Converter for AdamantConverter {
    fn dialect(&self) -> Dialect {
        Dialect::Adamant
    }

    fn convert(&self, request: &ConvertRequest) -> ConvertResult<ConversionOutput> {
        let level_source = read_input_source(Dialect::Adamant, &request.input_path, "level")?;
        let mut diagnostics = Diagnostics::new();
        let levels = parse_levels(&level_source, &mut diagnostics);

        let line_source = read_input_source(Dialect::Adamant, &self.line_file, "line")?;
        let mut lines = parse_lines(&line_source, &levels, &mut diagnostics)?;
        lines
            .transitions
            .sort_by(|lhs, rhs| lhs.wavelength.total_cmp(&rhs.wavelength));

        let rows = lines.transitions.iter().map(|transition| {
            let endpoint = |index: usize| TableEndpoint {
                energy: levels[index].energy,
                parity: &levels[index].parity,
                j: levels[index].j,
            };
            TableRow {
                wavelength: transition.wavelength,
                lower: endpoint(transition.lower),
                upper: endpoint(transition.upper),
                log_gf: transition.log_gf(),
                g_a: transition.g_a,
            }
        });
        let artifact = render_table(rows, false);

        info!(
            levels = levels.len(),
            transitions = lines.transitions.len(),
            "ADAMANT table complete"
        );

        let mut report = ConversionReport::new(Dialect::Adamant)
            .with_input(&request.input_path)
            .with_input(&self.line_file);
        report.levels_accepted = levels.len();
        report.transitions = lines.transitions.len();
        report.transitions_swapped = lines.swapped;
        report.absorb(diagnostics);

        Ok(ConversionOutput::new(artifact, report))
    }
}

#[cfg(test)]
mod tests {
    use super::AdamantConverter;
    use crate::domain::{ConvertErrorCategory, ConvertRequest, Dialect};
    use crate::modules::traits::Converter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rows_are_sorted_by_wavelength() {
        let temp = TempDir::new().expect("tempdir should be created");
        let levels = temp.path().join("levels.adm");
        let lines = temp.path().join("lines.adm");
        fs::write(&levels, "1 0.0 0.5 e config1\n2 1000.0 1.5 o config2\n")
            .expect("levels should be written");
        fs::write(
            &lines,
            "1 - 2 - - 6000.0 1.0e7 0.1\n1 - 2 - - 5000.0 1.0e7 0.1\n",
        )
        .expect("lines should be written");

        let output = AdamantConverter::new(&lines)
            .convert(&ConvertRequest::new(Dialect::Adamant, &levels))
            .expect("conversion should succeed");

        let rows: Vec<&str> = output.artifact.lines().skip(3).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("    5000.000"));
        assert!(rows[1].starts_with("    6000.000"));
        assert_eq!(output.default_path, None);
        assert_eq!(output.report.inputs.len(), 2);
    }

    #[test]
    fn missing_line_file_is_fatal() {
        let temp = TempDir::new().expect("tempdir should be created");
        let levels = temp.path().join("levels.adm");
        fs::write(&levels, "1 0.0 0.5 e config1\n").expect("levels should be written");

        let error = AdamantConverter::new(temp.path().join("none"))
            .convert(&ConvertRequest::new(Dialect::Adamant, &levels))
            .expect_err("line file is required");
        assert_eq!(error.category(), ConvertErrorCategory::IoSystemError);
    }
}
