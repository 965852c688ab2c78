//! Passphrase readers: terminal, environment, and scripted (tests).

use std::collections::VecDeque;
use std::io::{self, IsTerminal};

use dialoguer::Password;
use triplesec_core::SecretReader;
use zeroize::Zeroizing;

use crate::constants::env_vars;

/// Masked prompt on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalReader;

impl SecretReader for TerminalReader {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!(
                    "No passphrase provided and no TTY available. Set {}.",
                    env_vars::PASSPHRASE
                ),
            ));
        }
        // Length policy is enforced by the acquisition loop, not by the prompt.
        let passphrase = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(Zeroizing::new(passphrase.into_bytes()))
    }
}

/// Returns the same passphrase for every read, so confirmation always matches.
pub struct EnvReader {
    value: Zeroizing<Vec<u8>>,
}

impl EnvReader {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Zeroizing::new(value.into()),
        }
    }

    /// Read `TRIPLESEC_PASSPHRASE`; blank values count as unset.
    pub fn from_env() -> Option<Self> {
        std::env::var(env_vars::PASSPHRASE)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Self::new)
    }
}

impl SecretReader for EnvReader {
    fn read_secret(&mut self, _prompt: &str) -> io::Result<Zeroizing<Vec<u8>>> {
        Ok(self.value.clone())
    }
}

/// Replays a fixed list of entries, one per read.
pub struct ScriptedReader {
    attempts: VecDeque<Zeroizing<Vec<u8>>>,
}

impl ScriptedReader {
    /// Split a comma-separated list; empty items are dropped.
    pub fn parse(list: &str) -> Self {
        let attempts = list
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Zeroizing::new(item.as_bytes().to_vec()))
            .collect();
        Self { attempts }
    }

    pub fn from_env() -> Option<Self> {
        let list = Zeroizing::new(std::env::var(env_vars::TEST_PASSPHRASE_ATTEMPTS).ok()?);
        Some(Self::parse(&list))
    }
}

impl SecretReader for ScriptedReader {
    fn read_secret(&mut self, _prompt: &str) -> io::Result<Zeroizing<Vec<u8>>> {
        self.attempts.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "No passphrase attempts remaining",
            )
        })
    }
}

/// Where this run's passphrase comes from.
pub enum PassphraseSource {
    Scripted(ScriptedReader),
    Environment(EnvReader),
    Terminal(TerminalReader),
}

impl PassphraseSource {
    /// Scripted attempts (test builds only), then the environment, then the terminal.
    pub fn detect() -> Self {
        if cfg!(feature = "test-support") {
            if let Some(reader) = ScriptedReader::from_env() {
                return PassphraseSource::Scripted(reader);
            }
        }
        if let Some(reader) = EnvReader::from_env() {
            return PassphraseSource::Environment(reader);
        }
        PassphraseSource::Terminal(TerminalReader)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PassphraseSource::Scripted(_) => "scripted",
            PassphraseSource::Environment(_) => "environment",
            PassphraseSource::Terminal(_) => "terminal",
        }
    }
}

impl SecretReader for PassphraseSource {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Zeroizing<Vec<u8>>> {
        match self {
            PassphraseSource::Scripted(reader) => reader.read_secret(prompt),
            PassphraseSource::Environment(reader) => reader.read_secret(prompt),
            PassphraseSource::Terminal(reader) => reader.read_secret(prompt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triplesec_core::{acquire_passphrase, ErrorKind, Mode};

    #[test]
    fn test_env_reader_repeats_value() {
        let mut reader = EnvReader::new("correcthorsebattery");
        let first = reader.read_secret("Passphrase").unwrap();
        let second = reader.read_secret("Confirm").unwrap();
        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn test_env_reader_satisfies_confirmation() {
        let mut reader = EnvReader::new("correcthorsebattery");
        let mut notices = Vec::new();
        let secret = acquire_passphrase(&mut reader, &mut notices, Mode::Encrypt).unwrap();
        assert_eq!(secret.expose(), b"correcthorsebattery");
        assert!(notices.is_empty());
    }

    #[test]
    fn test_scripted_reader_parse_trims_and_skips_empty() {
        let mut reader = ScriptedReader::parse(" short , ,correcthorsebattery,");
        assert_eq!(reader.read_secret("p").unwrap().as_slice(), b"short");
        assert_eq!(
            reader.read_secret("p").unwrap().as_slice(),
            b"correcthorsebattery"
        );
        let err = reader.read_secret("p").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_scripted_exhaustion_is_input_unavailable() {
        let mut reader = ScriptedReader::parse("correcthorsebattery");
        let mut notices = Vec::new();
        let err = acquire_passphrase(&mut reader, &mut notices, Mode::Encrypt).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputUnavailable);
    }

    #[test]
    fn test_source_delegates() {
        let mut source = PassphraseSource::Environment(EnvReader::new("correcthorsebattery"));
        assert_eq!(source.name(), "environment");
        assert_eq!(
            source.read_secret("Passphrase").unwrap().as_slice(),
            b"correcthorsebattery"
        );
    }
}
