use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    layout::{KeyDirectory, KeyDirectoryState},
    provider::{KeyProvider, ProviderError},
};

/// Errors produced while provisioning a keypair.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A key file is already present; nothing was written.
    #[error("there is already a key in this path ({})", path.display())]
    AlreadyExists { path: PathBuf },
    /// The provider could not produce the private key; nothing was written.
    #[error("failed to generate private key: {source}")]
    GenerationFailed { source: ProviderError },
    /// The private key was written but its public key could not be.
    /// The private key is left on disk.
    #[error("failed to derive public key: {source}")]
    DerivationFailed {
        private_key: PathBuf,
        source: ProviderError,
    },
}

/// Locations of a freshly written keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

/// Writes a new keypair into a key directory, refusing to overwrite existing keys.
pub struct KeyProvisioner<P: KeyProvider> {
    provider: P,
}

impl<P: KeyProvider> KeyProvisioner<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate `private.pem` then derive `public.pem` from it.
    ///
    /// The existence check is not atomic with the writes; the tool assumes
    /// exclusive use of the directory for the duration of one call.
    #[instrument(skip_all, fields(dir = %directory.root().display(), provider = self.provider.name()))]
    pub fn provision(&self, directory: &KeyDirectory) -> Result<KeyPairPaths, ProvisionError> {
        let state = directory.state();
        if state.is_occupied() {
            let path = match state {
                KeyDirectoryState::PublicOnly => directory.public_path(),
                _ => directory.private_path(),
            };
            debug!(?state, "refusing to overwrite existing key");
            return Err(ProvisionError::AlreadyExists { path });
        }

        let private_key = directory.private_path();
        let public_key = directory.public_path();

        debug!("generating private key");
        self.provider
            .generate_private_key(&private_key)
            .map_err(|source| ProvisionError::GenerationFailed { source })?;

        debug!("deriving public key");
        if let Err(source) = self.provider.derive_public_key(&private_key, &public_key) {
            warn!(
                private_key = %private_key.display(),
                "public key derivation failed; private key left in place"
            );
            return Err(ProvisionError::DerivationFailed {
                private_key,
                source,
            });
        }

        info!("keypair written");
        Ok(KeyPairPaths {
            private_key,
            public_key,
        })
    }
}
