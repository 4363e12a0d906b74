// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// このツールで発生するエラー
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid script type '{0}' entered. Please enter 'js' or 'ts'.")]
    InvalidScriptLang(String),

    #[error("'pages' directory not found under {}", .0.display())]
    PagesDirNotFound(PathBuf),

    #[error("'{0}' file not found.")]
    RoutesFileNotFound(String),

    #[error("project root {} is not usable", path.display())]
    ProjectRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input closed before all answers were given")]
    InputClosed,

    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),

    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScaffoldError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
