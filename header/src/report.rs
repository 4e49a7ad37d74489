//! Outcome of the external model converter.
//!
//! The converter is run elsewhere; this module only decides whether one of
//! its steps succeeded, from the captured output and the report it leaves.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{HeaderError, HeaderResult};

/// Marker printed by the converter at the end of a successful step.
pub const SUCCESS_MARKER: &str = "elapsed time";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversionMode {
    Analyze,
    Validate,
    Generate,
}

impl ConversionMode {
    pub const ALL: [ConversionMode; 3] =
        [ConversionMode::Analyze, ConversionMode::Validate, ConversionMode::Generate];

    pub fn name(&self) -> &'static str {
        match self {
            ConversionMode::Analyze => "analyze",
            ConversionMode::Validate => "validate",
            ConversionMode::Generate => "generate",
        }
    }

    pub fn from_name(name: &str) -> Option<ConversionMode> {
        ConversionMode::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Modes enabled by a mask like `"011"` (analyze, validate, generate).
    ///
    /// Generation is mandatory, so only `001`, `011`, `101` and `111` are
    /// accepted.
    pub fn from_mask(mask: &str) -> HeaderResult<Vec<ConversionMode>> {
        if !matches!(mask, "001" | "011" | "101" | "111") {
            return Err(HeaderError::InvalidConfig(format!(
                "mode mask {mask:?} is not one of 001, 011, 101, 111"
            )));
        }
        Ok(mask
            .chars()
            .zip(ConversionMode::ALL)
            .filter(|(c, _)| *c == '1')
            .map(|(_, mode)| mode)
            .collect())
    }

    pub fn report_path(&self, output_dir: impl AsRef<Path>, c_model_name: &str) -> PathBuf {
        output_dir.as_ref().join(format!("{c_model_name}_{}_report.txt", self.name()))
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First failure reason in a converter report.
///
/// Report errors look like `error: E102(NotImplementedError): layer X`; the
/// leading `error` field is dropped and the rest kept.
pub fn first_error(report: &str) -> Option<String> {
    let line = report.lines().find(|l| l.starts_with("error"))?;
    let fields: Vec<&str> = line.trim().split(": ").collect();
    if fields.len() > 1 { Some(fields[1..].join(": ")) } else { Some(line.trim().to_string()) }
}

/// Checks one converter step from its captured standard output.
///
/// Without the success marker, the report must exist and its first `error`
/// line becomes the failure reason.
pub fn check_step(mode: ConversionMode, stdout: &str, report: impl AsRef<Path>) -> HeaderResult<()> {
    if stdout.contains(SUCCESS_MARKER) {
        return Ok(());
    }
    let report = report.as_ref();
    let failed = |reason: String| HeaderError::ConversionFailed { mode: mode.to_string(), reason };
    if !report.is_file() {
        return Err(failed(format!("no success marker and no report at {report:?}")));
    }
    let text = fs_err::read_to_string(report)?;
    match first_error(&text) {
        Some(reason) => Err(failed(reason)),
        None => Ok(()),
    }
}
