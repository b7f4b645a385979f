use std::path::{Path, PathBuf};
use thiserror::Error;

/// User-facing failure categories for both tools.
///
/// Library code propagates `anyhow::Error`; the binaries call
/// [`ToolError::classify`] once at the top and print the result.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("File '{}' not found.", path.display())]
    NotFound { path: PathBuf },

    #[error("Unable to decode '{}' with encoding {encoding}.", path.display())]
    UnsupportedEncoding { path: PathBuf, encoding: String },

    #[error("Unable to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0:#}")]
    Other(anyhow::Error),
}

impl ToolError {
    /// Sort an error from the read side of a run into a category.
    ///
    /// A `NotFound` I/O error anywhere in the chain is reported against
    /// `input_path`, the only file the read side opens.
    pub fn classify(err: anyhow::Error, input_path: &Path) -> Self {
        let err = match err.downcast::<ToolError>() {
            Ok(tool_error) => return tool_error,
            Err(err) => err,
        };

        let not_found = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
            .any(|io| io.kind() == std::io::ErrorKind::NotFound);

        if not_found {
            ToolError::NotFound { path: input_path.to_path_buf() }
        } else {
            ToolError::Other(err)
        }
    }
}
