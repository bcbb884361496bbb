use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use keygen_core::{KeyProvider, ProviderError};
use tracing::{debug, instrument};

/// Provider that delegates to the `openssl` command-line toolkit.
///
/// Arguments are passed as a vector, never through a shell, so paths with
/// spaces or metacharacters reach `openssl` verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpensslProvider {
    program: PathBuf,
}

impl Default for OpensslProvider {
    fn default() -> Self {
        Self::new("openssl")
    }
}

impl OpensslProvider {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, args: Vec<OsString>) -> Result<(), ProviderError> {
        let program = self.program.display().to_string();
        debug!(%program, ?args, "invoking openssl");
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::Command {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl KeyProvider for OpensslProvider {
    fn name(&self) -> &'static str {
        "openssl"
    }

    #[instrument(skip_all, fields(out = %out.display()))]
    fn generate_private_key(&self, out: &Path) -> Result<(), ProviderError> {
        self.run(genpkey_args(out))
    }

    #[instrument(skip_all, fields(private_key = %private_key.display(), out = %out.display()))]
    fn derive_public_key(&self, private_key: &Path, out: &Path) -> Result<(), ProviderError> {
        self.run(pubout_args(private_key, out))
    }
}

fn genpkey_args(out: &Path) -> Vec<OsString> {
    vec![
        "genpkey".into(),
        "-algorithm".into(),
        "X25519".into(),
        "-out".into(),
        out.as_os_str().to_owned(),
    ]
}

fn pubout_args(private_key: &Path, out: &Path) -> Vec<OsString> {
    vec![
        "pkey".into(),
        "-in".into(),
        private_key.as_os_str().to_owned(),
        "-pubout".into(),
        "-out".into(),
        out.as_os_str().to_owned(),
    ]
}
