use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Errors produced by cryptographic provider implementations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Reading or writing a key file failed.
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A key file did not contain a well-formed X25519 key.
    #[error("decode error: {0}")]
    Decode(String),
    /// The external provider program could not be started.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The external provider program ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },
}

impl ProviderError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProviderError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Source of X25519 key material (native library in production, subprocess or
/// test doubles elsewhere). Both operations block until the file is written.
pub trait KeyProvider {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Generate a fresh private key and write it PEM-encoded to `out`.
    fn generate_private_key(&self, out: &Path) -> Result<(), ProviderError>;

    /// Derive the public key of the private key stored at `private_key` and
    /// write it PEM-encoded to `out`.
    fn derive_public_key(&self, private_key: &Path, out: &Path) -> Result<(), ProviderError>;
}

impl<P: KeyProvider + ?Sized> KeyProvider for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn generate_private_key(&self, out: &Path) -> Result<(), ProviderError> {
        (**self).generate_private_key(out)
    }

    fn derive_public_key(&self, private_key: &Path, out: &Path) -> Result<(), ProviderError> {
        (**self).derive_public_key(private_key, out)
    }
}
