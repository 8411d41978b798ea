//! Single-pass MD5/SHA1/SHA256 digesting of a file.

use md5::Md5;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::CheckError;

/// Read buffer size; memory use stays constant regardless of file size.
const BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithms computed for every file.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Comparison order used during verification.
    pub(crate) const ALL: [DigestAlgorithm; 3] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha256 => "SHA256",
        }
    }

    /// Length of the lowercase hex rendering.
    pub(crate) fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

/// Digests of one byte stream, all taken from the same read pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileDigestSet {
    pub(crate) md5: String,
    pub(crate) sha1: String,
    pub(crate) sha256: String,
    pub(crate) bytes: u64,
}

impl FileDigestSet {
    pub(crate) fn get(&self, algorithm: DigestAlgorithm) -> &str {
        match algorithm {
            DigestAlgorithm::Md5 => &self.md5,
            DigestAlgorithm::Sha1 => &self.sha1,
            DigestAlgorithm::Sha256 => &self.sha256,
        }
    }

    /// Digests paired with their algorithm, in comparison order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (DigestAlgorithm, &str)> + '_ {
        DigestAlgorithm::ALL
            .into_iter()
            .map(move |algorithm| (algorithm, self.get(algorithm)))
    }
}

/// Fans each chunk out to one accumulator per algorithm.
struct DigestSink {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
    bytes: u64,
}

impl DigestSink {
    fn new() -> Self {
        Self {
            md5: Md5::new(),
            sha1: Sha1::new(),
            sha256: Sha256::new(),
            bytes: 0,
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        self.md5.update(chunk);
        self.sha1.update(chunk);
        self.sha256.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    fn finish(self) -> FileDigestSet {
        FileDigestSet {
            md5: hex::encode(self.md5.finalize()),
            sha1: hex::encode(self.sha1.finalize()),
            sha256: hex::encode(self.sha256.finalize()),
            bytes: self.bytes,
        }
    }
}

/// Stream a reader to EOF through all three accumulators.
pub(crate) fn digest_reader<R: Read>(mut reader: R) -> io::Result<FileDigestSet> {
    let mut sink = DigestSink::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        sink.update(&buffer[..read]);
    }
    Ok(sink.finish())
}

/// Hash a file in one pass.
///
/// The handle is dropped on any read failure; after a clean read it is closed
/// explicitly so a failing close is reported instead of ignored.
pub(crate) fn digest_file(path: &Path) -> Result<FileDigestSet, CheckError> {
    let mut file = fs::File::open(path).map_err(|err| CheckError::io(path, err))?;
    let digests = digest_reader(&mut file).map_err(|err| CheckError::io(path, err))?;
    close_file(file).map_err(|err| CheckError::io(path, err))?;
    Ok(digests)
}

#[cfg(unix)]
fn close_file(file: fs::File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn close_file(file: fs::File) -> io::Result<()> {
    drop(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Yields at most `step` bytes per read; optionally fails once drained.
    struct ChunkedReader<'a> {
        data: &'a [u8],
        step: usize,
        fail_at_end: bool,
    }

    impl Read for ChunkedReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                if self.fail_at_end {
                    return Err(io::Error::other("device went away"));
                }
                return Ok(0);
            }
            let len = self.step.min(buf.len()).min(self.data.len());
            buf[..len].copy_from_slice(&self.data[..len]);
            self.data = &self.data[len..];
            Ok(len)
        }
    }

    #[test]
    fn empty_input_matches_known_constants() {
        let set = digest_reader(io::empty()).expect("digest empty");
        assert_eq!(set.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(set.sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            set.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(set.bytes, 0);
    }

    #[test]
    fn hello_matches_known_digests() {
        let set = digest_reader(&b"hello"[..]).expect("digest hello");
        assert_eq!(set.md5, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(set.sha1, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
        assert_eq!(
            set.sha256,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(set.bytes, 5);
    }

    #[test]
    fn hex_lengths_are_fixed_and_lowercase() {
        let set = digest_reader(&b"The quick brown fox"[..]).expect("digest");
        for (algorithm, digest) in set.iter() {
            assert_eq!(digest.len(), algorithm.hex_len(), "{}", algorithm.label());
            assert!(digest
                .chars()
                .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch)));
        }
    }

    #[test]
    fn hashing_is_deterministic() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let first = digest_reader(&data[..]).expect("first pass");
        let second = digest_reader(&data[..]).expect("second pass");
        assert_eq!(first, second);
    }

    #[test]
    fn chunk_boundaries_do_not_change_digests() {
        let data: Vec<u8> = (0..(3 * BUFFER_SIZE + 17))
            .map(|i| (i * 31 % 256) as u8)
            .collect();
        let whole = digest_reader(&data[..]).expect("whole");
        let trickled = digest_reader(ChunkedReader {
            data: &data,
            step: 7,
            fail_at_end: false,
        })
        .expect("trickled");
        assert_eq!(whole, trickled);
        assert_eq!(whole.sha256, hex::encode(Sha256::digest(&data)));
        assert_eq!(whole.md5, hex::encode(Md5::digest(&data)));
        assert_eq!(whole.sha1, hex::encode(Sha1::digest(&data)));
        assert_eq!(whole.bytes, data.len() as u64);
    }

    #[test]
    fn read_failure_returns_error() {
        let result = digest_reader(ChunkedReader {
            data: b"partial content",
            step: 4,
            fail_at_end: true,
        });
        let err = result.expect_err("read failure must surface");
        assert_eq!(err.to_string(), "device went away");
    }

    #[test]
    fn digest_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"hello").expect("write temp file");
        let set = digest_file(file.path()).expect("digest file");
        assert_eq!(set.sha1, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn digest_file_missing_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = digest_file(&dir.path().join("gone.bin")).expect_err("missing file");
        assert!(matches!(err, CheckError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failed_close_maps_to_io_error() {
        use std::os::unix::io::FromRawFd;

        // A descriptor at the soft NOFILE limit can never be open.
        let mut limit = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        assert_eq!(unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) }, 0);
        let fd = libc::c_int::try_from(limit.rlim_cur).unwrap_or(libc::c_int::MAX - 1);
        let file = unsafe { fs::File::from_raw_fd(fd) };

        let err = close_file(file)
            .map_err(|err| CheckError::io("closed.bin", err))
            .expect_err("close of a dead descriptor");
        match err {
            CheckError::Io { path, source } => {
                assert_eq!(path, Path::new("closed.bin"));
                assert_eq!(source.raw_os_error(), Some(libc::EBADF));
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn digest_file_on_directory_fails_to_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = digest_file(dir.path()).expect_err("directory read");
        assert!(matches!(err, CheckError::Io { .. }));
    }
}
