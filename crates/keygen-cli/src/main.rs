mod cli;
mod config;
mod prompt;
mod provider;

use std::{
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use clap::Parser;
use color_eyre::Result;
use keygen_core::{KeyDirectory, KeyProvider, KeyProvisioner, ProvisionError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How a provisioning run ended; each variant has its own exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    AlreadyExists,
    GenerationFailed,
    DerivationFailed,
}

impl Outcome {
    fn code(self) -> u8 {
        match self {
            Outcome::Done => 0,
            Outcome::AlreadyExists => 1,
            Outcome::GenerationFailed => 2,
            Outcome::DerivationFailed => 3,
        }
    }
}

impl From<&ProvisionError> for Outcome {
    fn from(err: &ProvisionError) -> Self {
        match err {
            ProvisionError::AlreadyExists { .. } => Outcome::AlreadyExists,
            ProvisionError::GenerationFailed { .. } => Outcome::GenerationFailed,
            ProvisionError::DerivationFailed { .. } => Outcome::DerivationFailed,
        }
    }
}

/// Entry point: resolve the directory, provision, map the outcome to an exit status.
fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    let provisioner = KeyProvisioner::new(provider::provider_from_config(&config));

    let mut stdout = io::stdout();
    let directory = prompt::resolve_directory(cli.directory, &mut io::stdin().lock(), &mut stdout)?;
    let outcome = run(&provisioner, &directory, &mut stdout, &mut io::stderr())?;
    Ok(ExitCode::from(outcome.code()))
}

fn init_tracing() {
    // Respect user-provided filters; stdout is reserved for user-facing messages.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Provision `directory` and report the result on `out` / `err`.
fn run<P: KeyProvider>(
    provisioner: &KeyProvisioner<P>,
    directory: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<Outcome> {
    match provisioner.provision(&KeyDirectory::new(directory)) {
        Ok(_) => {
            writeln!(out, "Done")?;
            Ok(Outcome::Done)
        }
        Err(ProvisionError::AlreadyExists { .. }) => {
            writeln!(err, "Error: there is already a key in this path")?;
            Ok(Outcome::AlreadyExists)
        }
        Err(failure) => {
            writeln!(err, "Error: {failure}")?;
            if let ProvisionError::DerivationFailed { private_key, .. } = &failure {
                writeln!(
                    err,
                    "The private key was kept; delete {} and run again.",
                    private_key.display()
                )?;
            }
            Ok(Outcome::from(&failure))
        }
    }
}
