//! Scratch directory sweeper
//!
//! Per-job cleanup runs on every exit path, but files staged by a process
//! that crashed mid-request are left behind. The sweeper removes staged
//! inputs, their outputs and converter profiles once they are older than any
//! live job could be.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::staging::STAGING_PREFIX;

/// Remove staged files and profile directories in `dir` not modified
/// within `max_age`.
///
/// Returns the number of entries removed.
pub fn sweep_scratch_dir(dir: &Path, max_age: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(STAGING_PREFIX) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age < max_age {
            continue;
        }

        let result = if metadata.is_dir() {
            fs::remove_dir_all(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        match result {
            Ok(()) => {
                removed += 1;
                tracing::debug!(path = %entry.path().display(), "Swept orphaned scratch file");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %entry.path().display(),
                error = %e,
                "Failed to sweep scratch file"
            ),
        }
    }

    Ok(removed)
}

/// Start background sweep task
pub fn start_sweep_task(
    dir: PathBuf,
    interval: Duration,
    max_age: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            let sweep_dir = dir.clone();
            let result =
                tokio::task::spawn_blocking(move || sweep_scratch_dir(&sweep_dir, max_age)).await;

            match result {
                Ok(Ok(count)) if count > 0 => {
                    tracing::info!(count = count, dir = %dir.display(), "Swept orphaned scratch files");
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::warn!(dir = %dir.display(), error = %e, "Scratch sweep failed"),
                Err(e) => tracing::error!(error = %e, "Scratch sweep task panicked"),
            }
        }
    })
}
