//! Error types for the clause inserter.
//!
//! Uses the dual-error pattern: `InserterError` for failures that stop work
//! on a contract, and [`SkipReason`](crate::resolve::SkipReason) for
//! directives that are skipped while the rest of the batch carries on.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the clause inserter library.
#[derive(Debug, Error)]
pub enum InserterError {
    /// Invalid contract number.
    #[error("Invalid contract number: '{0}'. Expected digits (e.g., 12)")]
    InvalidContractNumber(String),

    /// Contract document not found.
    #[error("Contract file not found: {}", .0.display())]
    ContractNotFound(PathBuf),

    /// Output directory does not exist.
    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Paragraph index past the end of the document.
    #[error("Paragraph {index} is out of range (document has {count} paragraphs)")]
    ParagraphOutOfRange { index: usize, count: usize },

    /// Run without character data at the requested offset.
    #[error("Run {run} of paragraph {paragraph} has no text to edit")]
    UneditableRun { paragraph: usize, run: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

/// Result type alias for clause inserter operations.
pub type Result<T> = std::result::Result<T, InserterError>;
