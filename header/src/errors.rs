use std::path::PathBuf;

/// Fatal conditions of a header generation run.
///
/// An expected macro that is simply not found is *not* an error: the
/// corresponding field is left empty and its output line omitted.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("No such file {0:?}")]
    MissingInput(PathBuf),

    #[error("Macro {name} has value {value:?}, expected an integer from 1 to 65535")]
    MalformedMacro { name: String, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Conversion step {mode} failed: {reason}")]
    ConversionFailed { mode: String, reason: String },

    #[error("Unsupported model file {0:?}")]
    UnsupportedModel(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type HeaderResult<T> = Result<T, HeaderError>;
