use std::fmt::Display;

use course_advisor::curriculum::CurriculumError;
use thiserror::Error;

pub(crate) type AdvisorResult<T> = Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub(crate) enum AdvisorError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to read {file}, more details: {source}")]
    InvalidJson {
        file: String,
        source: serde_json::Error,
    },
    #[error("Failed to write the output, more details: {0}")]
    Output(#[from] serde_json::Error),
    #[error("The curriculum is malformed, more details: {0}")]
    Curriculum(#[from] CurriculumError),
}

impl AdvisorError {
    pub(crate) fn invalid_json(file: impl Display, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            file: format!("{file}"),
            source,
        }
    }
}
