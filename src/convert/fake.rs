//! In-process converter used by unit tests

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::converter::DocumentConverter;
use super::types::{ConverterRun, JobError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMode {
    /// Write `%PDF-1.4\n` followed by the input bytes
    Render,
    /// Exit non-zero without output
    Fail,
    /// Exit non-zero after writing a truncated output file
    FailWithPartialOutput,
    /// Exit zero without output
    NoOutput,
    Panic,
}

pub struct FakeConverter {
    mode: FakeMode,
    calls: AtomicUsize,
}

impl FakeConverter {
    pub fn new(mode: FakeMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn expected_pdf(body: &[u8]) -> Vec<u8> {
        [b"%PDF-1.4\n".as_slice(), body].concat()
    }

    fn output_path(input: &Path, outdir: &Path) -> std::path::PathBuf {
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        outdir.join(format!("{}.pdf", name))
    }
}

impl DocumentConverter for FakeConverter {
    fn convert(&self, input: &Path, outdir: &Path) -> Result<ConverterRun, JobError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = Self::output_path(input, outdir);

        match self.mode {
            FakeMode::Render => {
                let body = fs::read(input).expect("fake converter failed to read staged input");
                fs::write(&output, Self::expected_pdf(&body))
                    .expect("fake converter failed to write output");
                Ok(ConverterRun {
                    success: true,
                    exit_code: Some(0),
                    stdout: format!("convert {} -> {}", input.display(), output.display()),
                    stderr: String::new(),
                })
            }
            FakeMode::Fail => Ok(ConverterRun {
                success: false,
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "Error: source file could not be loaded".to_string(),
            }),
            FakeMode::FailWithPartialOutput => {
                fs::write(&output, b"%PDF-1.4\n%truncated")
                    .expect("fake converter failed to write partial output");
                Ok(ConverterRun {
                    success: false,
                    exit_code: Some(81),
                    stdout: String::new(),
                    stderr: "crashed".to_string(),
                })
            }
            FakeMode::NoOutput => Ok(ConverterRun {
                success: true,
                exit_code: Some(0),
                ..Default::default()
            }),
            FakeMode::Panic => panic!("converter crashed"),
        }
    }

    fn program(&self) -> &str {
        "fake-soffice"
    }
}
