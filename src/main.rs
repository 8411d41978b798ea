//! hashcheck entrypoint: hash one file and optionally verify a candidate digest.

mod error;
mod hashing;
mod paths;
mod prompt;
mod report;
mod transcript;
mod verify;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::{CheckError, EXIT_FAILURE};
use crate::hashing::{digest_file, DigestAlgorithm};
use crate::paths::check_target;
use crate::prompt::read_candidate;
use crate::report::{write_digests, write_json, write_verification, Palette, Report};
use crate::transcript::Transcript;
use crate::verify::{normalize, verify, Verification};

const NOTES: &str = "\
Notes:
  Candidate hashes are compared in uppercase with all whitespace removed.
  All three digests are always calculated in a single read of the file.
  Press Enter at the HASH prompt to skip verification.

Algorithms:
  MD5     32 hex characters, weak, compatibility only
  SHA1    40 hex characters, deprecated
  SHA256  64 hex characters, recommended";

/// CLI arguments for a single hashing run.
#[derive(Parser, Debug)]
#[command(
    name = "hashcheck",
    version,
    about = "Calculate MD5, SHA1 and SHA256 of a file and verify a hash against them",
    after_help = NOTES
)]
struct Args {
    /// Full path of the file to analyze
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Hash to verify instead of prompting for one
    #[arg(long, value_name = "HASH")]
    hash: Option<String>,

    /// Print a JSON report instead of text (never prompts)
    #[arg(long)]
    json: bool,

    /// Disable colored verification output
    #[arg(long)]
    no_color: bool,

    /// Log each step to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<CheckError>() {
                Some(check) => {
                    eprintln!("\nError: {check}");
                    check.exit_code()
                }
                None => {
                    eprintln!("\nError: {err:#}");
                    EXIT_FAILURE
                }
            };
            ExitCode::from(code)
        }
    }
}

/// Hash the target, print the digests, then verify a candidate if one is given.
fn run(args: Args) -> Result<()> {
    let mut transcript = Transcript::new(args.verbose);
    let palette = if args.no_color {
        Palette::plain()
    } else {
        Palette::ansi()
    };

    let path = match args.file {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => {
            Args::command().print_help().context("print usage")?;
            let err = CheckError::Argument("missing required argument -f <PATH>".to_string());
            return Err(err.into());
        }
    };
    check_target(&path)?;
    transcript.note(format!("target: {}", path.display()));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.json {
        writeln!(out, "\nCalculating hashes...").context("write progress")?;
        out.flush().context("flush stdout")?;
    }

    let digests = digest_file(&path)?;
    transcript.note(format!("hashed {} bytes", digests.bytes));

    if args.json {
        let candidate = args.hash.unwrap_or_default();
        let verification = verify(&candidate, &digests);
        note_verification(&mut transcript, &candidate, verification);
        return write_json(&mut out, &Report::new(&path, &digests, verification));
    }

    write_digests(&mut out, &path, &digests)?;
    let candidate = match args.hash {
        Some(candidate) => candidate,
        None => {
            let stdin = io::stdin();
            read_candidate(&mut stdin.lock(), &mut out).context("read candidate hash")?
        }
    };
    let verification = verify(&candidate, &digests);
    note_verification(&mut transcript, &candidate, verification);
    write_verification(&mut out, palette, verification)?;
    out.flush().context("flush stdout")?;
    Ok(())
}

fn note_verification(transcript: &mut Transcript, candidate: &str, verification: Verification) {
    match verification {
        Verification::Skipped => transcript.note("no candidate supplied, verification skipped"),
        Verification::Matched(algorithm) => {
            transcript.note(format!("candidate matched {}", algorithm.label()))
        }
        Verification::NoMatch => {
            let len = normalize(candidate).chars().count();
            match DigestAlgorithm::ALL
                .into_iter()
                .find(|algorithm| algorithm.hex_len() == len)
            {
                Some(algorithm) => transcript.note(format!(
                    "candidate has {} length ({len}) but different content",
                    algorithm.label()
                )),
                None => transcript.note(format!("candidate length {len} fits no digest")),
            }
        }
    }
}
