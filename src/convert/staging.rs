//! Scratch directory staging
//!
//! Each job writes its input to a freshly named file in the scratch
//! directory. The converter's output path is derived from that name, so
//! concurrent jobs never touch each other's files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::types::JobError;

/// File name prefix of staged inputs; also used by the scratch sweeper.
pub const STAGING_PREFIX: &str = "pdfconv-";

/// Staged input, expected output and converter profile of one job.
///
/// All three are removed when the job is dropped.
#[derive(Debug)]
pub struct StagedJob {
    input_path: PathBuf,
    output_path: PathBuf,
    profile_dir: PathBuf,
}

impl StagedJob {
    /// Write `body` to a new uniquely named file in `scratch_dir`.
    pub fn stage(scratch_dir: &Path, body: &[u8]) -> Result<Self, JobError> {
        Self::stage_with(tempfile::Builder::new().prefix(STAGING_PREFIX), scratch_dir, body)
    }

    fn stage_with(
        builder: &tempfile::Builder<'_, '_>,
        scratch_dir: &Path,
        body: &[u8],
    ) -> Result<Self, JobError> {
        let mut file = builder.tempfile_in(scratch_dir).map_err(JobError::Staging)?;

        // Until `keep` succeeds the file is still owned by `NamedTempFile`
        // and is deleted on error.
        file.write_all(body).map_err(JobError::Staging)?;
        file.flush().map_err(JobError::Staging)?;

        let (_, input_path) = file
            .keep()
            .map_err(|e| JobError::Staging(e.error))?;

        let job = Self {
            output_path: output_path_for(&input_path),
            profile_dir: profile_dir_for(&input_path),
            input_path,
        };

        // The input name is new, but `<name>.pdf` may be left over from a
        // crashed job and would be mistaken for this job's output.
        if job.output_path.exists() {
            tracing::warn!(
                path = %job.output_path.display(),
                "Removing stale output before conversion"
            );
            fs::remove_file(&job.output_path).map_err(JobError::Staging)?;
        }

        Ok(job)
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    /// Remove whichever artifacts exist. Safe to call more than once.
    pub fn cleanup(&self) {
        remove_if_exists(&self.input_path);
        remove_if_exists(&self.output_path);
        remove_dir_if_exists(&self.profile_dir);
    }
}

impl Drop for StagedJob {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// `<dir>/<name>` becomes `<dir>/<name>.pdf`
fn output_path_for(input_path: &Path) -> PathBuf {
    let mut name = input_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".pdf");
    input_path.with_file_name(name)
}

/// `<dir>/<name>` becomes `<dir>/<name>-profile`
///
/// The converter keeps a per-job user profile here so concurrent
/// instances do not hand their work to each other.
pub fn profile_dir_for(input_path: &Path) -> PathBuf {
    let mut name = input_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push("-profile");
    input_path.with_file_name(name)
}

fn remove_dir_if_exists(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_dir_all(path) {
        Ok(()) => tracing::trace!(path = %path.display(), "Removed converter profile"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove converter profile"
        ),
    }
}

fn remove_if_exists(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => tracing::trace!(path = %path.display(), "Removed scratch file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove scratch file"
        ),
    }
}
