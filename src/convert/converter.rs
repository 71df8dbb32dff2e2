//! External converter invocation
//!
//! Runs LibreOffice (or a compatible program) headless:
//!
//! ```text
//! soffice -env:UserInstallation=file://<input>-profile --headless \
//!     --convert-to pdf:writer_pdf_Export:ExportFonts=1 <input> --outdir <dir>
//! ```
//!
//! The converter writes `<dir>/<input stem>.pdf`. Staged inputs carry no
//! extension, so the output name is the input file name plus `.pdf`.
//!
//! Instances sharing a user profile hand their work to whichever instance
//! started first and exit 0 without output, so every job gets its own.

use std::path::Path;
use std::process::Command;

use super::staging::profile_dir_for;
use super::types::{ConverterRun, JobError};
use crate::config::ConverterConfig;

/// A blocking document-to-PDF converter.
///
/// Implementations are called from a blocking worker thread, never from the
/// async runtime directly.
pub trait DocumentConverter: Send + Sync {
    /// Convert `input`, writing the PDF into `outdir`.
    fn convert(&self, input: &Path, outdir: &Path) -> Result<ConverterRun, JobError>;

    /// Program name, for logs
    fn program(&self) -> &str;
}

/// Converter backed by the `soffice` command line
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: String,
    filter: String,
}

impl SofficeConverter {
    pub fn new(program: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            filter: filter.into(),
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.program.clone(), config.filter.clone())
    }

    fn command(&self, input: &Path, outdir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(format!(
                "-env:UserInstallation={}",
                file_url(&profile_dir_for(input))
            ))
            .arg("--headless")
            .arg("--convert-to")
            .arg(&self.filter)
            .arg(input)
            .arg("--outdir")
            .arg(outdir);
        command
    }
}

/// `file://` URL for an absolute path, each segment percent-encoded
fn file_url(path: &Path) -> String {
    let encoded: Vec<String> = path
        .to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("file://{}", encoded.join("/"))
}

impl DocumentConverter for SofficeConverter {
    fn convert(&self, input: &Path, outdir: &Path) -> Result<ConverterRun, JobError> {
        let output = self
            .command(input, outdir)
            .output()
            .map_err(|source| JobError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(ConverterRun {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn program(&self) -> &str {
        &self.program
    }
}
