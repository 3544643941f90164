use std::path::PathBuf;

/// Common error type for config loading and JSON encoding.
#[derive(thiserror::Error, Debug)]
pub enum UtilError {
    #[error("cannot access config file {path}: {source}")]
    ConfigAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("cannot write config as YAML: {0}")]
    ConfigDump(#[source] serde_yaml::Error),
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("keys must be str, int, float, bool or None, not {0}")]
    UnsupportedKey(String),
    #[error("field {field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("timestamp {0} does not fit in integer milliseconds")]
    TimestampRange(f64),
}

pub type UtilResult<T> = Result<T, UtilError>;
