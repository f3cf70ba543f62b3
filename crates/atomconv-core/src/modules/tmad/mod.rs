//! TMAD/TMAP model atoms to WRPLOT Grotrian diagrams.

mod parser;

use super::filter::LevelFilter;
use super::grotrian::{DiagramStyle, GrotrianInput, draw};
use super::helpers::read_input_source;
use super::report::ConversionReport;
use super::traits::{ConversionOutput, Converter};
use crate::domain::{ConvertRequest, ConvertResult, Dialect};
use tracing::{info, warn};

use parser::TmadReader;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TmadConverter {
    pub filter: LevelFilter,
}

impl TmadConverter {
    pub fn new(filter: LevelFilter) -> Self {
        Self { filter }
    }
}

impl Converter for TmadConverter {
    fn dialect(&self) -> Dialect {
        Dialect::Tmad
    }

    fn convert(&self, request: &ConvertRequest) -> ConvertResult<ConversionOutput> {
        let source = read_input_source(Dialect::Tmad, &request.input_path, "TMAD")?;
        let model = TmadReader::new(&self.filter).read(&source);

        let mut report = ConversionReport::new(Dialect::Tmad).with_input(&request.input_path);
        report.levels_accepted = model.levels.len();
        report.levels_filtered = model.filtered_levels;
        report.transitions = model.transitions.len();
        report.transitions_swapped = model.swapped_transitions;
        report.absorb(model.diagnostics);

        let input = GrotrianInput {
            source_label: request.source_label(),
            ionization_limit: model.ionization_limit,
            column_offset: 0.0,
            levels: model.levels,
            transitions: model.transitions,
        };

        let Some(diagram) = draw(&input, &DiagramStyle::TMAD) else {
            warn!(
                "** found no levels ** in {}, no diagram written",
                request.input_path.display()
            );
            return Ok(ConversionOutput::new(String::new(), report));
        };

        info!(
            levels = diagram.levels,
            lines = diagram.transitions,
            top_labels = diagram.top_labels,
            "TMAD Grotrian diagram complete"
        );
        report.top_labels = diagram.top_labels;
        Ok(ConversionOutput::new(diagram.text, report))
    }
}

#[cfg(test)]
mod tests {
    use super::TmadConverter;
    use crate::common::constants::SPEED_OF_LIGHT_CM_PER_S;
    use crate::domain::{ConvertErrorCategory, ConvertRequest, Dialect};
    use crate::modules::filter::LevelFilter;
    use crate::modules::traits::Converter;
    use std::fs;
    use tempfile::TempDir;

    fn write_model(temp: &TempDir, levels: &[(&str, f64, f64)]) -> std::path::PathBuf {
        let mut lines = vec!["ATOM".to_string(), "HE 1".to_string(), "L".to_string()];
        for (name, wavenumber, weight) in levels {
            lines.push(format!(
                "{:<10}{:<10}{:.9e} {:.1}",
                name,
                "",
                wavenumber * SPEED_OF_LIGHT_CM_PER_S,
                weight
            ));
        }
        lines.push("0".to_string());
        let path = temp.path().join("he2.tmad");
        fs::write(&path, lines.join("\n")).expect("model should be written");
        path
    }

    #[test]
    fn converts_levels_into_a_diagram() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_model(
            &temp,
            &[("HE21S  2S", 400_000.0, 2.0), ("HE22P  2PO", 100_000.0, 6.0)],
        );

        let output = TmadConverter::default()
            .convert(&ConvertRequest::new(Dialect::Tmad, &path))
            .expect("conversion should succeed");

        assert!(output.artifact.contains("PLOT: Grotrian Diagram of TMAD File: "));
        assert!(output.artifact.contains("** ionization limit: 400000.00\n"));
        assert!(output.artifact.contains("** found no lines **\n"));
        assert!(output.artifact.contains("\\LUN 63.33 YMAX 0.000 0.080 0.2 &H2&MP&Ho&M\n"));
        assert_eq!(output.report.levels_accepted, 2);
        assert_eq!(output.report.top_labels, 2);
        assert_eq!(output.default_path, None);
    }

    #[test]
    fn zero_levels_is_not_an_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_model(&temp, &[("HE21S  2S", 400_000.0, 2.0)]);

        let converter = TmadConverter::new(LevelFilter {
            max_energy: 0.0,
            ..LevelFilter::default()
        });
        let output = converter
            .convert(&ConvertRequest::new(Dialect::Tmad, &path))
            .expect("empty diagrams are not fatal");

        assert!(output.artifact.is_empty());
        assert_eq!(output.report.levels_filtered, 1);
    }

    #[test]
    fn unreadable_input_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = TmadConverter::default()
            .convert(&ConvertRequest::new(Dialect::Tmad, temp.path().join("none")))
            .expect_err("missing file should fail");
        assert_eq!(error.category(), ConvertErrorCategory::IoSystemError);
        assert_eq!(error.exit_code(), 3);
    }
}
