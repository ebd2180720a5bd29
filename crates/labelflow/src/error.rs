use labelflow_core::IllegalTermError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unsupported problem file extension for {}; expected .json or .toml", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("constraint #{index} is outside the supported term fragment")]
    IllegalConstraint {
        index: usize,
        #[source]
        source: IllegalTermError,
    },

    #[error("{count} constraint(s) cannot be satisfied")]
    Unsatisfiable { count: usize },
}
