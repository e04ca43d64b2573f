//! External converter invocation.
//!
//! The converter is an opaque process: it receives the source file path
//! and the post id, and writes its artifact to the output root by its own
//! convention. That convention matching [`crate::paths`] is a deployment
//! invariant, not something this module can enforce.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use viewbridge_core::{AppError, ConversionSettings};

/// Mode flag passed to the converter script.
const CONVERT_MODE_FLAG: &str = "--gotenberg";

/// Runs the external converter with a per-invocation deadline.
#[derive(Clone)]
pub struct Converter {
    runtime: String,
    script: PathBuf,
    timeout: Duration,
}

impl Converter {
    pub fn new(settings: &ConversionSettings) -> Self {
        Self {
            runtime: settings.converter_runtime.clone(),
            script: settings.converter_script.clone(),
            timeout: Duration::from_secs(settings.converter_timeout_secs),
        }
    }

    /// Convert `source`, namespacing the output under `post_id`.
    ///
    /// A single invocation failure fails the attachment; there is no retry.
    /// On timeout the child is killed (`kill_on_drop`) and the attachment
    /// fails like any other conversion error.
    pub async fn convert(&self, source: &Path, post_id: &str) -> Result<(), AppError> {
        let mut cmd = Command::new(&self.runtime);
        cmd.arg(&self.script)
            .arg(source)
            .arg(CONVERT_MODE_FLAG)
            .arg(post_id)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                return Err(AppError::ConversionFailed(format!(
                    "converter timed out after {}s: {} {}",
                    self.timeout.as_secs(),
                    self.runtime,
                    self.script.display(),
                )));
            }
            Ok(Err(e)) => {
                return Err(AppError::ConversionFailed(format!(
                    "failed to launch converter {}: {}",
                    self.runtime, e
                )));
            }
            Ok(Ok(output)) => output,
        };

        let combined = combined_output(&output.stdout, &output.stderr);

        if !output.status.success() {
            return Err(AppError::ConversionFailed(format!(
                "converter exited with {}: output:\n{}",
                output.status, combined
            )));
        }

        tracing::debug!(
            post_id = %post_id,
            source = %source.display(),
            output = %combined,
            "Converter finished"
        );
        Ok(())
    }
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined
}
