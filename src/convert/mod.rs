//! Document Conversion Module
//!
//! One conversion job per request:
//! 1. Stage the request body as a uniquely named file in the scratch directory
//! 2. Run the external converter headless against it
//! 3. Check the exit status and that `<input>.pdf` exists
//! 4. Read the PDF into memory
//! 5. Remove both files, whatever happened above

pub mod converter;
pub mod staging;
pub mod sweep;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use converter::{DocumentConverter, SofficeConverter};
pub use staging::{StagedJob, STAGING_PREFIX};
pub use sweep::{start_sweep_task, sweep_scratch_dir};
pub use types::*;

/// Run a conversion job to completion on the current thread.
///
/// Blocks until the converter exits. Staged files are removed before this
/// returns, on success and on every error path.
pub fn run_job(
    converter: &dyn DocumentConverter,
    scratch_dir: &Path,
    body: &[u8],
) -> Result<Vec<u8>, JobError> {
    let job = StagedJob::stage(scratch_dir, body)?;
    tracing::debug!(
        bytes = body.len(),
        input = %job.input_path().display(),
        "Staged conversion input"
    );

    let run = converter.convert(job.input_path(), scratch_dir)?;
    tracing::debug!(
        program = converter.program(),
        exit_code = ?run.exit_code,
        stdout = %run.stdout.trim(),
        stderr = %run.stderr.trim(),
        "Converter finished"
    );

    if !run.success {
        tracing::warn!(
            program = converter.program(),
            exit_code = ?run.exit_code,
            stderr = %run.stderr.trim(),
            "Converter reported failure"
        );
        return Err(JobError::ConverterFailed {
            exit_code: run.exit_code,
            stderr: run.stderr,
        });
    }

    if !job.output_path().exists() {
        tracing::warn!(output = %job.output_path().display(), "Converter output not found");
        return Err(JobError::MissingOutput(job.output_path().to_path_buf()));
    }

    tracing::debug!(output = %job.output_path().display(), "Retrieving converter output");
    let pdf = fs::read(job.output_path()).map_err(JobError::Retrieval)?;

    job.cleanup();
    Ok(pdf)
}

/// Run a conversion job on the blocking thread pool.
///
/// Logs from the worker thread stay inside the caller's current span.
pub async fn convert_document(
    converter: Arc<dyn DocumentConverter>,
    scratch_dir: PathBuf,
    body: impl AsRef<[u8]> + Send + 'static,
) -> Result<Vec<u8>, JobError> {
    let span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        run_job(converter.as_ref(), &scratch_dir, body.as_ref())
    })
    .await?
}
