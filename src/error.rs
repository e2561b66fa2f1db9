use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    #[error("category weights must sum to 1.0, got {total:.4}")]
    InvalidTotal { total: f64 },

    #[error("weight '{name}' must be a finite non-negative number, got {value}")]
    InvalidValue { name: &'static str, value: f64 },

    #[error("type weights must not increase from exam to quiz to assignment to discussion to announcement")]
    TypeOrder,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error(transparent)]
    Weights(#[from] WeightError),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid JSON in {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported input format for {}: expected .csv or .json", .0.display())]
    UnsupportedFormat(PathBuf),
}
