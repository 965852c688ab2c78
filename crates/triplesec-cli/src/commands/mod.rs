//! Command handlers, one per subcommand.

mod files;
mod misc;

use crate::cli::{Cli, Commands};
use crate::config::TripleSecConfig;

pub use files::{handle_decrypt, handle_encrypt};
pub use misc::handle_completions;

/// Dispatch the parsed subcommand.
pub fn run(cli: &Cli, config: &TripleSecConfig) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Encrypt(args) => handle_encrypt(cli, config, args),
        Commands::Decrypt(args) => handle_decrypt(cli, config, args),
        Commands::Completions { shell } => handle_completions(*shell),
    }
}
