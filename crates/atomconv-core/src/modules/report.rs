//! Run diagnostics: skipped records and summary counts of one conversion.

use crate::domain::{ConvertError, ConvertResult, Dialect};
use crate::parser::SourceLine;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use super::serialization::write_text_artifact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    Level,
    Transition,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub kind: SkipKind,
    pub line_number: usize,
    pub reason: String,
    pub line: String,
}

/// Collects records that were dropped while parsing.
///
/// Every entry is also emitted as a `warn!` event so the status stream shows
/// the offending line as it is encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    skipped: Vec<SkippedRecord>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(&mut self, kind: SkipKind, line: &SourceLine<'_>, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(line = line.number, "{}: {}", reason, line.raw);
        self.skipped.push(SkippedRecord {
            kind,
            line_number: line.number,
            reason,
            line: line.raw.to_string(),
        });
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn count(&self, kind: SkipKind) -> usize {
        self.skipped
            .iter()
            .filter(|record| record.kind == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn into_records(self) -> Vec<SkippedRecord> {
        self.skipped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub dialect: Dialect,
    pub inputs: Vec<String>,
    pub levels_accepted: usize,
    pub levels_rejected: usize,
    pub levels_filtered: usize,
    pub transitions: usize,
    pub transitions_dropped: usize,
    pub transitions_swapped: usize,
    pub deviating_lines: usize,
    pub top_labels: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl ConversionReport {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            inputs: Vec::new(),
            levels_accepted: 0,
            levels_rejected: 0,
            levels_filtered: 0,
            transitions: 0,
            transitions_dropped: 0,
            transitions_swapped: 0,
            deviating_lines: 0,
            top_labels: 0,
            skipped: Vec::new(),
        }
    }

    pub fn with_input(mut self, path: &Path) -> Self {
        self.inputs.push(path.display().to_string());
        self
    }

    /// Folds parser diagnostics into the rejection counters and record list.
    pub fn absorb(&mut self, diagnostics: Diagnostics) {
        self.levels_rejected += diagnostics.count(SkipKind::Level);
        self.transitions_dropped += diagnostics.count(SkipKind::Transition);
        self.skipped.extend(diagnostics.into_records());
    }

    pub fn to_json(&self) -> ConvertResult<String> {
        serde_json::to_string_pretty(self).map_err(|source| {
            ConvertError::internal(
                "SYS.REPORT_SERIALIZE",
                format!("failed to serialize run report: {}", source),
            )
        })
    }

    pub fn write_json(&self, path: &Path) -> ConvertResult<()> {
        let json = self.to_json()?;
        write_text_artifact(path, &json).map_err(|source| {
            ConvertError::io_system(
                "IO.REPORT_WRITE",
                format!("failed to write run report '{}': {}", path.display(), source),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversionReport, Diagnostics, SkipKind};
    use crate::domain::Dialect;
    use crate::parser::SourceLine;
    use serde_json::Value;
    use std::path::Path;
    use tempfile::TempDir;

    fn line(number: usize, raw: &str) -> SourceLine<'_> {
        SourceLine { number, raw }
    }

    #[test]
    fn diagnostics_count_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.skip(SkipKind::Level, &line(3, "bad level"), "error with multiplicity");
        diagnostics.skip(SkipKind::Transition, &line(9, "bad line"), "levels not found");
        diagnostics.skip(SkipKind::Level, &line(4, "bad level"), "error with parity");

        assert_eq!(diagnostics.count(SkipKind::Level), 2);
        assert_eq!(diagnostics.count(SkipKind::Transition), 1);
        assert_eq!(diagnostics.count(SkipKind::Line), 0);
        assert_eq!(diagnostics.skipped()[1].line_number, 9);
    }

    #[test]
    fn report_absorbs_diagnostics_into_counters() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.skip(SkipKind::Level, &line(1, "x"), "bad");
        diagnostics.skip(SkipKind::Transition, &line(2, "y"), "bad");

        let mut report = ConversionReport::new(Dialect::Toss).with_input(Path::new("levels.dat"));
        report.absorb(diagnostics);

        assert_eq!(report.levels_rejected, 1);
        assert_eq!(report.transitions_dropped, 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.inputs, vec!["levels.dat".to_string()]);
    }

    #[test]
    fn report_serializes_to_json_file() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("reports/run.json");

        let mut report = ConversionReport::new(Dialect::Tmad);
        report.levels_accepted = 4;
        report.top_labels = 2;
        report.write_json(&path).expect("report should be written");

        let parsed: Value = serde_json::from_str(
            &std::fs::read_to_string(&path).expect("report should be readable"),
        )
        .expect("report should be valid JSON");
        assert_eq!(parsed["dialect"], "Tmad");
        assert_eq!(parsed["levels_accepted"], 4);
        assert_eq!(parsed["top_labels"], 2);
        assert!(parsed["skipped"].as_array().expect("array").is_empty());
    }
}
