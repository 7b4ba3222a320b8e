use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tiledforge operations
#[derive(Error, Diagnostic, Debug)]
pub enum TmxError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tmx::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("XML error: {0}")]
    #[diagnostic(code(tmx::xml), help("The document is not well-formed XML"))]
    Xml(#[from] roxmltree::Error),

    #[error("Parse error: {message}")]
    #[diagnostic(code(tmx::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Decode error: {message}")]
    #[diagnostic(code(tmx::decode))]
    Decode { message: String },

    #[error("Config error: {message}")]
    #[diagnostic(code(tmx::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Check failed: {message}")]
    #[diagnostic(code(tmx::check))]
    Check { message: String },
}

impl TmxError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        TmxError::Decode {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TmxError>;
