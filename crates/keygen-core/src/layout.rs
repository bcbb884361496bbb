use std::path::{Path, PathBuf};

/// File name of the PEM-encoded private key inside a key directory.
pub const PRIVATE_KEY_FILE: &str = "private.pem";
/// File name of the PEM-encoded public key inside a key directory.
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// Caller-supplied directory that holds (or will hold) a keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDirectory {
    root: PathBuf,
}

/// Which of the two key files are currently present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirectoryState {
    Empty,
    PrivateOnly,
    PublicOnly,
    Complete,
}

impl KeyDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn private_path(&self) -> PathBuf {
        self.root.join(PRIVATE_KEY_FILE)
    }

    pub fn public_path(&self) -> PathBuf {
        self.root.join(PUBLIC_KEY_FILE)
    }

    /// Inspect the directory. Only regular files count as present.
    pub fn state(&self) -> KeyDirectoryState {
        match (self.private_path().is_file(), self.public_path().is_file()) {
            (false, false) => KeyDirectoryState::Empty,
            (true, false) => KeyDirectoryState::PrivateOnly,
            (false, true) => KeyDirectoryState::PublicOnly,
            (true, true) => KeyDirectoryState::Complete,
        }
    }
}

impl KeyDirectoryState {
    /// True when at least one key file would be clobbered by a new keypair.
    pub fn is_occupied(self) -> bool {
        self != KeyDirectoryState::Empty
    }
}
