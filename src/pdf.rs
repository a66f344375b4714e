use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

pub trait PdfWriter {
    /// Renders `html` into a PDF at `output`, resolving relative references
    /// against `base_url`. An existing file at `output` is replaced.
    fn write_pdf(
        &self,
        html: &str,
        base_url: &Path,
        output: &Path,
    ) -> Result<(), PdfError>;
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error(
        "Missing dependencies. Could not run '{}': {reason}\n\
         Install WeasyPrint (https://weasyprint.org), e.g.:\n  \
         pip install weasyprint",
        program.display()
    )]
    MissingDependency { program: PathBuf, reason: String },

    #[error("Could not start '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: io::Error,
    },

    #[error("PDF rendering failed ({status}):\n{stderr}")]
    Render { status: ExitStatus, stderr: String },

    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Shells out to the `weasyprint` command line renderer.
#[derive(Debug, Clone)]
pub struct WeasyPrint {
    program: PathBuf,
}

impl WeasyPrint {
    /// Checks that `program` can be run before any work is done.
    pub fn locate(program: &Path) -> Result<Self, PdfError> {
        let output = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| PdfError::MissingDependency {
                program: program.to_path_buf(),
                reason: source.to_string(),
            })?;
        if !output.status.success() {
            return Err(PdfError::MissingDependency {
                program: program.to_path_buf(),
                reason: format!("--version exited with {}", output.status),
            });
        }
        log::debug!(
            "using {}: {}",
            program.display(),
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(Self {
            program: program.to_path_buf(),
        })
    }
}

impl PdfWriter for WeasyPrint {
    fn write_pdf(
        &self,
        html: &str,
        base_url: &Path,
        output: &Path,
    ) -> Result<(), PdfError> {
        log::info!(
            "rendering {} with {} (base {})",
            output.display(),
            self.program.display(),
            base_url.display()
        );
        let mut child = Command::new(&self.program)
            .arg("--base-url")
            .arg(base_url)
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PdfError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // The renderer may exit before reading all of stdin, so its status
        // is checked before any write error.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(html.as_bytes()),
            None => Ok(()),
        };

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(PdfError::Render {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr)
                    .trim()
                    .to_string(),
            });
        }
        written?;
        Ok(())
    }
}
