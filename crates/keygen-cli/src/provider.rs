use keygen_core::KeyProvider;
use keygen_provider::{NativeProvider, OpensslProvider};
use tracing::debug;

use crate::config::{Config, ProviderKind};

/// Build the key provider selected by config.
pub fn provider_from_config(config: &Config) -> Box<dyn KeyProvider> {
    match config.provider {
        ProviderKind::Native => {
            debug!("using native x25519 provider");
            Box::new(NativeProvider)
        }
        ProviderKind::Openssl => {
            let binary = config.openssl.as_ref().and_then(|c| c.binary.clone());
            let provider = binary.map(OpensslProvider::new).unwrap_or_default();
            debug!(program = %provider.program().display(), "using openssl provider");
            Box::new(provider)
        }
    }
}
