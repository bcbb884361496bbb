use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use keygen_core::{KeyProvider, ProviderError};
use rand::rngs::OsRng;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::encoding::{decode_private_key, encode_private_key, encode_public_key};

/// In-process provider backed by `x25519-dalek` and the OS random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProvider;

impl KeyProvider for NativeProvider {
    fn name(&self) -> &'static str {
        "native"
    }

    #[instrument(skip_all, fields(out = %out.display()))]
    fn generate_private_key(&self, out: &Path) -> Result<(), ProviderError> {
        let secret = StaticSecret::random_from_rng(OsRng);
        let pem_text = encode_private_key(&secret);
        write_new_file(out, pem_text.as_bytes(), FileMode::Private)?;
        debug!("private key written");
        Ok(())
    }

    #[instrument(skip_all, fields(private_key = %private_key.display(), out = %out.display()))]
    fn derive_public_key(&self, private_key: &Path, out: &Path) -> Result<(), ProviderError> {
        let raw = Zeroizing::new(
            fs::read(private_key).map_err(|e| ProviderError::io(private_key, e))?,
        );
        let secret = decode_private_key(&raw)?;
        let pem_text = encode_public_key(&PublicKey::from(&secret));
        write_new_file(out, pem_text.as_bytes(), FileMode::Public)?;
        debug!("public key written");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileMode {
    /// Owner read/write only (the temp file default).
    Private,
    /// World readable.
    Public,
}

/// Write `contents` to a temp file beside `path`, then move it into place
/// without replacing anything already there.
fn write_new_file(path: &Path, contents: &[u8], mode: FileMode) -> Result<(), ProviderError> {
    let parent = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| ProviderError::io(&parent, e))?;
    tmp.write_all(contents)
        .map_err(|e| ProviderError::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| ProviderError::io(tmp.path(), e))?;

    if mode == FileMode::Public {
        set_public_permissions(tmp.as_file()).map_err(|e| ProviderError::io(tmp.path(), e))?;
    }

    tmp.persist_noclobber(path)
        .map_err(|e| ProviderError::io(path, e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn set_public_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_public_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode_public_key, derive_public_pem};

    #[test]
    fn generated_pair_is_consistent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let private_path = dir.path().join("private.pem");
        let public_path = dir.path().join("public.pem");

        NativeProvider
            .generate_private_key(&private_path)
            .expect("generate");
        NativeProvider
            .derive_public_key(&private_path, &public_path)
            .expect("derive");

        let private_pem = fs::read(&private_path).expect("read private");
        let public_pem = fs::read_to_string(&public_path).expect("read public");
        assert!(public_pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert_eq!(derive_public_pem(&private_pem).expect("rederive"), public_pem);
        decode_public_key(public_pem.as_bytes()).expect("decode public");
    }

    #[test]
    fn generates_distinct_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("a.pem");
        let second = dir.path().join("b.pem");

        NativeProvider.generate_private_key(&first).expect("first");
        NativeProvider.generate_private_key(&second).expect("second");

        assert_ne!(
            fs::read(&first).expect("read"),
            fs::read(&second).expect("read")
        );
    }

    #[test]
    fn never_overwrites_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("private.pem");
        fs::write(&path, b"keep me").expect("seed");

        let err = NativeProvider
            .generate_private_key(&path)
            .expect_err("must not clobber");
        assert!(matches!(err, ProviderError::Io { .. }));
        assert_eq!(fs::read(&path).expect("read"), b"keep me");
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 1);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("private.pem");

        let err = NativeProvider
            .generate_private_key(&path)
            .expect_err("no parent");
        assert!(matches!(err, ProviderError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn derive_rejects_malformed_private_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let private_path = dir.path().join("private.pem");
        let public_path = dir.path().join("public.pem");
        fs::write(&private_path, b"garbage").expect("seed");

        let err = NativeProvider
            .derive_public_key(&private_path, &public_path)
            .expect_err("malformed");
        assert!(matches!(err, ProviderError::Decode(_)));
        assert!(!public_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn file_modes_follow_key_visibility() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let private_path = dir.path().join("private.pem");
        let public_path = dir.path().join("public.pem");
        NativeProvider
            .generate_private_key(&private_path)
            .expect("generate");
        NativeProvider
            .derive_public_key(&private_path, &public_path)
            .expect("derive");

        let mode = |p: &Path| fs::metadata(p).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode(private_path.as_path()), 0o600);
        assert_eq!(mode(public_path.as_path()), 0o644);
    }

    #[test]
    fn parent_of_bare_file_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("private.pem")), PathBuf::from("."));
        assert_eq!(
            parent_dir(Path::new("/tmp/keys/private.pem")),
            PathBuf::from("/tmp/keys")
        );
    }
}
