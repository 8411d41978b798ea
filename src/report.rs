//! Human-readable and JSON output for a hashcheck run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::hashing::{DigestAlgorithm, FileDigestSet};
use crate::verify::Verification;

/// Color codes wrapped around verdict lines.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Palette {
    pub(crate) success: &'static str,
    pub(crate) failure: &'static str,
    pub(crate) reset: &'static str,
}

impl Palette {
    pub(crate) const fn ansi() -> Self {
        Self {
            success: "\x1b[92m",
            failure: "\x1b[91m",
            reset: "\x1b[0m",
        }
    }

    pub(crate) const fn plain() -> Self {
        Self {
            success: "",
            failure: "",
            reset: "",
        }
    }
}

/// Tag prefixed to a successful verification.
pub(crate) const SUCCESS_TAG: &str = "✓ VERIFICATION SUCCESSFUL";
/// Tag prefixed to a failed verification.
pub(crate) const FAILURE_TAG: &str = "✗ VERIFICATION FAILED";

/// Print the file path followed by the labeled digests.
pub(crate) fn write_digests<W: Write>(
    out: &mut W,
    path: &Path,
    digests: &FileDigestSet,
) -> Result<()> {
    writeln!(out, "\nFile: {}\n", path.display()).context("write file header")?;
    for (algorithm, digest) in digests.iter() {
        let label = format!("{}:", algorithm.label());
        writeln!(out, "{label:<8}{digest}").context("write digest line")?;
    }
    writeln!(out).context("write digest footer")?;
    Ok(())
}

/// Print the verdict line; skipped verifications print nothing.
pub(crate) fn write_verification<W: Write>(
    out: &mut W,
    palette: Palette,
    verification: Verification,
) -> Result<()> {
    match verification {
        Verification::Skipped => Ok(()),
        Verification::Matched(algorithm) => writeln!(
            out,
            "\n{}{SUCCESS_TAG}: hash matches {}{}",
            palette.success,
            algorithm.label(),
            palette.reset
        )
        .context("write verification result"),
        Verification::NoMatch => writeln!(
            out,
            "\n{}{FAILURE_TAG}: the provided hash does not match any of the calculated ones{}",
            palette.failure, palette.reset
        )
        .context("write verification result"),
    }
}

/// Machine-readable summary emitted with `--json`.
#[derive(Serialize)]
pub(crate) struct Report<'a> {
    pub(crate) path: String,
    pub(crate) bytes: u64,
    pub(crate) md5: &'a str,
    pub(crate) sha1: &'a str,
    pub(crate) sha256: &'a str,
    pub(crate) verification: VerificationMeta,
}

/// Verification status recorded in the JSON report.
#[derive(Serialize)]
pub(crate) struct VerificationMeta {
    pub(crate) status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) algorithm: Option<DigestAlgorithm>,
}

#[derive(Serialize, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub(crate) enum VerificationStatus {
    Skipped,
    NoMatch,
    Matched,
}

impl From<Verification> for VerificationMeta {
    fn from(verification: Verification) -> Self {
        match verification {
            Verification::Skipped => VerificationMeta {
                status: VerificationStatus::Skipped,
                algorithm: None,
            },
            Verification::NoMatch => VerificationMeta {
                status: VerificationStatus::NoMatch,
                algorithm: None,
            },
            Verification::Matched(algorithm) => VerificationMeta {
                status: VerificationStatus::Matched,
                algorithm: Some(algorithm),
            },
        }
    }
}

impl<'a> Report<'a> {
    pub(crate) fn new(
        path: &Path,
        digests: &'a FileDigestSet,
        verification: Verification,
    ) -> Self {
        Report {
            path: path.display().to_string(),
            bytes: digests.bytes,
            md5: &digests.md5,
            sha1: &digests.sha1,
            sha256: &digests.sha256,
            verification: verification.into(),
        }
    }
}

/// Serialize the report as pretty JSON followed by a newline.
pub(crate) fn write_json<W: Write>(out: &mut W, report: &Report<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).context("serialize report")?;
    writeln!(out).context("write report")?;
    Ok(())
}
