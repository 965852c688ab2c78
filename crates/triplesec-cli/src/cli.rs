use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use triplesec_core::VERSION;

use crate::constants::env_vars;

/// TripleSec - passphrase-based, triple-layer file encryption
#[derive(Parser)]
#[command(name = "triplesec")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Quiet mode (no progress bar, no summary line)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH", env = env_vars::CONFIG)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// File to encrypt
    #[arg(value_name = "ORIGIN")]
    pub origin: PathBuf,

    /// Directory that receives `<ORIGIN name>.3c`
    #[arg(value_name = "DESTINATION_DIR")]
    pub destination_dir: PathBuf,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Encrypted file
    #[arg(value_name = "ORIGIN")]
    pub origin: PathBuf,

    /// Path of the decrypted file
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file into a directory
    #[command(alias = "e")]
    Encrypt(EncryptArgs),

    /// Decrypt a file to a path
    #[command(alias = "d")]
    Decrypt(DecryptArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_encrypt_alias() {
        let cli = Cli::try_parse_from(["triplesec", "e", "notes.txt", "out"]).unwrap();
        match cli.command {
            Commands::Encrypt(args) => {
                assert_eq!(args.origin, PathBuf::from("notes.txt"));
                assert_eq!(args.destination_dir, PathBuf::from("out"));
            }
            _ => panic!("expected encrypt"),
        }
    }

    #[test]
    fn test_decrypt_with_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["triplesec", "decrypt", "notes.txt.3c", "notes.txt", "-d", "-q"])
                .unwrap();
        assert!(cli.debug);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Decrypt(_)));
    }

    #[test]
    fn test_debug_short_flag_is_not_decrypt() {
        let cli = Cli::try_parse_from(["triplesec", "-d", "d", "in.3c", "out"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Decrypt(_)));
    }

    #[test]
    fn test_encrypt_requires_destination() {
        assert!(Cli::try_parse_from(["triplesec", "encrypt", "notes.txt"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["triplesec"]).is_err());
    }
}
