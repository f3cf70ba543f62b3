use super::report::ConversionReport;
use crate::domain::{ConvertRequest, ConvertResult, Dialect};
use std::path::PathBuf;

/// Text produced by one converter run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutput {
    /// Main data artifact: transition table, diagram or ident list.
    pub artifact: String,
    /// Where the artifact goes when the caller did not choose a path.
    /// `None` means standard output.
    pub default_path: Option<PathBuf>,
    /// Secondary text that always goes to standard output.
    pub listing: Option<String>,
    pub report: ConversionReport,
}

impl ConversionOutput {
    pub fn new(artifact: String, report: ConversionReport) -> Self {
        Self {
            artifact,
            default_path: None,
            listing: None,
            report,
        }
    }

    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    pub fn with_listing(mut self, listing: String) -> Self {
        self.listing = Some(listing);
        self
    }

    /// Resolves the artifact destination: an explicit request path wins over
    /// the converter default.
    pub fn destination(&self, request: &ConvertRequest) -> Option<PathBuf> {
        request
            .output_path
            .clone()
            .or_else(|| self.default_path.clone())
    }
}

pub trait Converter {
    fn dialect(&self) -> Dialect;

    fn convert(&self, request: &ConvertRequest) -> ConvertResult<ConversionOutput>;
}

#[cfg(test)]
mod tests {
    use super::{ConversionOutput, Converter};
    use crate::domain::{ConvertError, ConvertErrorCategory, ConvertRequest, ConvertResult, Dialect};
    use crate::modules::report::ConversionReport;
    use std::path::PathBuf;

    struct FailingConverter;

    impl Converter for FailingConverter {
        fn dialect(&self) -> Dialect {
            Dialect::Toss
        }

        fn convert(&self, _request: &ConvertRequest) -> ConvertResult<ConversionOutput> {
            Err(ConvertError::computation("RUN.NO_LEVELS", "found no levels"))
        }
    }

    #[test]
    fn converter_uses_shared_error_types() {
        let request = ConvertRequest::new(Dialect::Toss, "levels.dat");
        let error = FailingConverter
            .convert(&request)
            .expect_err("converter should fail");
        assert_eq!(error.category(), ConvertErrorCategory::ComputationError);
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.code(), "RUN.NO_LEVELS");
        assert_eq!(FailingConverter.dialect(), Dialect::Toss);
    }

    #[test]
    fn explicit_output_path_overrides_default() {
        let output = ConversionOutput::new(String::new(), ConversionReport::new(Dialect::Nist))
            .with_default_path("lines.txt_out_toss");

        let request = ConvertRequest::new(Dialect::Nist, "lines.txt");
        assert_eq!(
            output.destination(&request),
            Some(PathBuf::from("lines.txt_out_toss"))
        );

        let request = request.with_output("custom.toss");
        assert_eq!(output.destination(&request), Some(PathBuf::from("custom.toss")));
    }

    #[test]
    fn stdout_is_used_without_any_path() {
        let output = ConversionOutput::new(String::new(), ConversionReport::new(Dialect::Tmad));
        let request = ConvertRequest::new(Dialect::Tmad, "c4.tmad");
        assert_eq!(output.destination(&request), None);
    }
}
