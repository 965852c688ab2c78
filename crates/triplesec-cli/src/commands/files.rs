use std::io;

use triplesec_core::{
    acquire_passphrase, FileTask, KdfParams, Mode, Pipeline, Secret, TransformReport,
    TripleSecProvider,
};

use crate::cli::{Cli, DecryptArgs, EncryptArgs};
use crate::config::TripleSecConfig;
use crate::helpers::PassphraseSource;
use crate::ui::{ByteProgress, UiContext};

pub fn handle_encrypt(cli: &Cli, config: &TripleSecConfig, args: &EncryptArgs) -> anyhow::Result<()> {
    let secret = obtain_secret(Mode::Encrypt)?;
    let task = FileTask::encrypt(&args.origin, &args.destination_dir, secret)?;
    let report = run_task(cli, config, task)?;
    if !cli.quiet {
        println!(
            "Encrypted {} -> {} ({} bytes)",
            args.origin.display(),
            report.destination.display(),
            report.bytes_written
        );
    }
    Ok(())
}

pub fn handle_decrypt(cli: &Cli, config: &TripleSecConfig, args: &DecryptArgs) -> anyhow::Result<()> {
    let secret = obtain_secret(Mode::Decrypt)?;
    let task = FileTask::decrypt(&args.origin, &args.destination, secret);
    let report = run_task(cli, config, task)?;
    if !cli.quiet {
        println!(
            "Decrypted {} -> {} ({} bytes)",
            args.origin.display(),
            report.destination.display(),
            report.bytes_written
        );
    }
    Ok(())
}

/// Run the acquisition loop against whichever passphrase source is available.
/// Policy notices go to stderr.
fn obtain_secret(mode: Mode) -> anyhow::Result<Secret> {
    let mut source = PassphraseSource::detect();
    tracing::debug!(source = source.name(), ?mode, "acquiring passphrase");
    let mut notices = io::stderr();
    Ok(acquire_passphrase(&mut source, &mut notices, mode)?)
}

fn run_task(cli: &Cli, config: &TripleSecConfig, task: FileTask) -> anyhow::Result<TransformReport> {
    let ctx = UiContext::from_env(cli.quiet, config.progress.enabled);
    let label = match task.mode() {
        Mode::Encrypt => "Encrypting",
        Mode::Decrypt => "Decrypting",
    };
    let mut progress = ByteProgress::new(&ctx, label);
    let provider = TripleSecProvider::new(KdfParams::default());
    Ok(Pipeline::new(provider, &mut progress).run(task)?)
}
