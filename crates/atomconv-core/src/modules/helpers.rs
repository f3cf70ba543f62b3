use crate::domain::{ConvertError, ConvertResult, Dialect};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Reads a required input file; failure aborts the run.
pub(crate) fn read_input_source(
    dialect: Dialect,
    path: &Path,
    role: &str,
) -> ConvertResult<String> {
    info!("attempting to open {} file: {}", role, path.display());
    fs::read_to_string(path).map_err(|source| {
        ConvertError::io_system(
            "IO.INPUT_READ",
            format!(
                "failed to read {} {} file '{}': {}",
                dialect,
                role,
                path.display(),
                source
            ),
        )
    })
}

/// Reads an input file whose absence only degrades the output.
pub(crate) fn maybe_read_optional_input_source(path: &Path, role: &str) -> Option<String> {
    info!("attempting to open {} file: {}", role, path.display());
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(source) => {
            warn!(
                "could not open {} file '{}': {}",
                role,
                path.display(),
                source
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{maybe_read_optional_input_source, read_input_source};
    use crate::domain::{ConvertErrorCategory, Dialect};
    use tempfile::TempDir;

    #[test]
    fn missing_required_input_is_an_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = read_input_source(Dialect::Adamant, &temp.path().join("missing"), "level")
            .expect_err("missing file should fail");
        assert_eq!(error.category(), ConvertErrorCategory::IoSystemError);
        assert_eq!(error.code(), "IO.INPUT_READ");
        assert!(error.message().contains("ADAMANT level file"));
    }

    #[test]
    fn missing_optional_input_is_absent() {
        let temp = TempDir::new().expect("tempdir should be created");
        assert_eq!(
            maybe_read_optional_input_source(&temp.path().join("missing"), "line"),
            None
        );

        let path = temp.path().join("lines.dat");
        std::fs::write(&path, "1.0\n").expect("write should succeed");
        assert_eq!(
            maybe_read_optional_input_source(&path, "line").as_deref(),
            Some("1.0\n")
        );
    }
}
