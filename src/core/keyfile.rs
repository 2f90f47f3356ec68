//! Key file persistence.
//!
//! A key file holds one line of key text (see `EncryptionKey::to_text`).
//! Files are created with mode 0600 on Unix and only replaced when the
//! caller forces it.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::cipher::{self, CipherKind, EncryptionKey};
use crate::error::{KeyError, Result};

/// Load the key stored at `path`.
///
/// # Errors
///
/// Returns `KeyError::NotFound` if there is no file, `KeyError::Read` if it
/// cannot be read and `KeyError::InvalidFormat` if it holds no valid key.
pub fn load(path: &Path) -> Result<EncryptionKey> {
    if !path.is_file() {
        return Err(KeyError::NotFound(path.to_path_buf()).into());
    }

    #[cfg(unix)]
    check_permissions(path);

    let contents = zeroize::Zeroizing::new(fs::read_to_string(path).map_err(KeyError::Read)?);
    let key = EncryptionKey::from_text(&contents)?;
    debug!(path = %path.display(), kind = %key.kind(), "loaded key");
    Ok(key)
}

/// Write `key` to `path`.
///
/// # Errors
///
/// Returns `KeyError::AlreadyExists` when a file is present and `force` is
/// false, or `KeyError::Write` if writing fails.
pub fn save(path: &Path, key: &EncryptionKey, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(KeyError::AlreadyExists(path.to_path_buf()).into());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(KeyError::Write)?;
    }

    let text = key.to_text();
    fs::write(path, format!("{}\n", text.as_str())).map_err(KeyError::Write)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(KeyError::Write)?;
    }

    debug!(path = %path.display(), kind = %key.kind(), "saved key");
    Ok(())
}

/// Load the key at `path`, generating and saving a `kind` key if absent.
///
/// Returns the key and whether it was created. An existing key is used as
/// is, even if its kind differs from `kind`.
///
/// # Errors
///
/// Propagates `load` and `save` errors.
pub fn load_or_generate(path: &Path, kind: CipherKind) -> Result<(EncryptionKey, bool)> {
    if path.exists() {
        let key = load(path)?;
        if key.kind() != kind {
            warn!(
                path = %path.display(),
                found = %key.kind(),
                requested = %kind,
                "key file kind differs from requested cipher, using the key file"
            );
        }
        return Ok((key, false));
    }

    info!("Generating encryption key...");
    let key = cipher::generate_key(kind);
    save(path, &key, false)?;
    Ok((key, true))
}

/// Short, non-secret identifier for a key: the first 8 bytes of the
/// SHA-256 of its text form, in hex.
pub fn fingerprint(key: &EncryptionKey) -> String {
    let digest = Sha256::digest(key.to_text().as_bytes());
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(unix)]
fn check_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "key file is readable by other users, run: chmod 600"
            );
        }
    }
}
