//! Whole-file encrypt/decrypt orchestration.
//!
//! One [`FileTask`] is executed start to finish: validate the secret, build a
//! cipher, read the source fully into memory, transform it, and write the
//! result atomically. The destination is only touched after the transform
//! succeeds, so a failed run never leaves a partial or empty destination.
//!
//! Files are held in memory in full; this is meant for interactive,
//! single-file use rather than very large inputs.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::crypto::{Cipher, CipherProvider, Salt};
use crate::error::{Result, TripleSecError};
use crate::fs::write_atomic;
use crate::progress::ProgressReporter;
use crate::secret::{validate_passphrase, Secret};

/// Extension appended to encrypted files ("triple-ciphered").
pub const ENCRYPTED_EXTENSION: &str = "3c";

const READ_CHUNK: usize = 64 * 1024;

/// Upper bound on the buffer reserved up front from the reported file size.
const MAX_INITIAL_RESERVE: u64 = 64 * 1024 * 1024;

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

/// One encrypt-or-decrypt request over a single file pair.
#[derive(Debug)]
pub struct FileTask {
    mode: Mode,
    source: PathBuf,
    destination: PathBuf,
    secret: Secret,
}

impl FileTask {
    /// Encrypt `source` into `destination_dir/<name>.3c`.
    pub fn encrypt(
        source: impl Into<PathBuf>,
        destination_dir: impl AsRef<Path>,
        secret: Secret,
    ) -> Result<Self> {
        let source = source.into();
        let destination = encrypted_destination(&source, destination_dir.as_ref())?;
        Ok(Self {
            mode: Mode::Encrypt,
            source,
            destination,
            secret,
        })
    }

    /// Decrypt `source` into exactly `destination`.
    pub fn decrypt(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        secret: Secret,
    ) -> Self {
        Self {
            mode: Mode::Decrypt,
            source: source.into(),
            destination: destination.into(),
            secret,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Outcome of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformReport {
    pub mode: Mode,
    pub destination: PathBuf,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// `destination_dir/<base name of source>.3c`
pub fn encrypted_destination(source: &Path, destination_dir: &Path) -> Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        TripleSecError::io(
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        )
    })?;
    let mut file_name = name.to_os_string();
    file_name.push(".");
    file_name.push(ENCRYPTED_EXTENSION);
    Ok(destination_dir.join(file_name))
}

/// Runs file tasks against a cipher provider, reporting read progress.
pub struct Pipeline<'a, P: CipherProvider> {
    provider: P,
    progress: &'a mut dyn ProgressReporter,
}

impl<'a, P: CipherProvider> Pipeline<'a, P> {
    pub fn new(provider: P, progress: &'a mut dyn ProgressReporter) -> Self {
        Self { provider, progress }
    }

    /// Execute one task. The task's secret is dropped (and zeroized) once the
    /// cipher has been built.
    pub fn run(&mut self, task: FileTask) -> Result<TransformReport> {
        let FileTask {
            mode,
            source,
            destination,
            secret,
        } = task;
        let _span = tracing::debug_span!("file_task", ?mode).entered();
        tracing::debug!(source = %source.display(), destination = %destination.display(), "starting");

        validate_passphrase(secret.expose())?;

        let mut cipher = match mode {
            Mode::Encrypt => {
                let salt = Salt::generate()?;
                self.provider
                    .new_cipher(secret.expose(), Some(salt.as_bytes()))?
            }
            Mode::Decrypt => self.provider.new_cipher(secret.expose(), None)?,
        };
        drop(secret);

        let input = self.read_source(&source)?;
        ensure_distinct(&source, &destination)?;

        let output = match mode {
            Mode::Encrypt => cipher.encrypt(&input)?,
            Mode::Decrypt => cipher.decrypt(&input)?,
        };

        write_atomic(&destination, &output).map_err(|e| TripleSecError::io(&destination, e))?;

        let report = TransformReport {
            mode,
            destination,
            bytes_read: input.len() as u64,
            bytes_written: output.len() as u64,
        };
        tracing::info!(
            destination = %report.destination.display(),
            bytes_read = report.bytes_read,
            bytes_written = report.bytes_written,
            "transform complete"
        );
        Ok(report)
    }

    fn read_source(&mut self, path: &Path) -> Result<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| TripleSecError::io(path, e))?;
        let metadata = file.metadata().map_err(|e| TripleSecError::io(path, e))?;
        if !metadata.is_file() {
            return Err(TripleSecError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let total = metadata.len();
        self.progress.start(total);

        // Metadata can overstate what is actually there (sparse files); grow as we read.
        let mut buffer: Vec<u8> = Vec::new();
        buffer
            .try_reserve(initial_reserve(total))
            .map_err(|e| out_of_memory(path, e))?;
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let n = match file.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(TripleSecError::io(path, e)),
            };
            buffer
                .try_reserve(n)
                .map_err(|e| out_of_memory(path, e))?;
            buffer.extend_from_slice(&chunk[..n]);
            self.progress.advance(n as u64);
        }
        self.progress.finish();

        tracing::debug!(bytes = buffer.len(), "source read");
        Ok(buffer)
    }
}

fn out_of_memory(path: &Path, err: std::collections::TryReserveError) -> TripleSecError {
    TripleSecError::io(path, io::Error::new(io::ErrorKind::OutOfMemory, err))
}

fn initial_reserve(reported_len: u64) -> usize {
    usize::try_from(reported_len.min(MAX_INITIAL_RESERVE)).unwrap_or(0)
}

/// Refuse to overwrite the file being read.
fn ensure_distinct(source: &Path, destination: &Path) -> Result<()> {
    let same = match (source.canonicalize(), destination.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(TripleSecError::io(
            destination,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination is the same file as the source",
            ),
        ));
    }
    Ok(())
}
