//! Registry artifact I/O.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Write `bytes` to `path` by way of a temporary file in the same
/// directory, so readers see either the old artifact or the new one.
///
/// # Errors
///
/// Returns an I/O error if the temporary file cannot be created, written
/// or moved into place. The previous artifact is untouched in that case.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".secreg-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
    Ok(())
}

/// Read the artifact at `path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "artifact read");
    Ok(bytes)
}
