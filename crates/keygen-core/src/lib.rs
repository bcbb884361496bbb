//! Core abstractions for keygen: the key directory layout, the provider contract,
//! and the provisioner that ties them together.
//! This crate is intentionally small; concrete cryptography lives in `keygen-provider`.

pub mod layout;
pub mod provider;
pub mod provisioner;

pub use layout::{KeyDirectory, KeyDirectoryState, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
pub use provider::{KeyProvider, ProviderError};
pub use provisioner::{KeyPairPaths, KeyProvisioner, ProvisionError};
