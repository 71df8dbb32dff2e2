//! Conversion job types

use std::path::PathBuf;

// ============================================================================
// Converter Output
// ============================================================================

/// Outcome of one converter process invocation
#[derive(Debug, Clone, Default)]
pub struct ConverterRun {
    /// Whether the process exited successfully
    pub success: bool,

    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

// ============================================================================
// Error Types
// ============================================================================

/// Conversion job error types
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Failed to stage input document: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Converter exited with status {exit_code:?}: {stderr}")]
    ConverterFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Converter produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Failed to read converted document: {0}")]
    Retrieval(#[source] std::io::Error),

    #[error("Conversion worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl JobError {
    /// Whether the converter itself rejected the input, as opposed to an
    /// unexpected failure around it.
    pub fn is_conversion_failure(&self) -> bool {
        matches!(self, Self::ConverterFailed { .. } | Self::MissingOutput(_))
    }
}
