//! Keygen command.

use std::path::PathBuf;

use crate::cli::{cli_path, output, Context};
use crate::core::cipher::{self, CipherKind};
use crate::core::keyfile;
use crate::error::Result;

/// Generate a key file.
pub fn execute(
    ctx: &Context,
    key_file: Option<PathBuf>,
    cipher: Option<CipherKind>,
    force: bool,
) -> Result<()> {
    let path = match key_file {
        Some(p) => cli_path(p)?,
        None => ctx.config.registry.key_file.clone(),
    };
    let kind = cipher.unwrap_or(ctx.config.registry.cipher);

    let key = cipher::generate_key(kind);
    keyfile::save(&path, &key, force)?;
    tracing::info!("Generated {} key at {}", kind, path.display());

    output::success(&format!("generated {} key at {}", kind, output::path(&path)));
    output::kv("fingerprint", keyfile::fingerprint(&key));
    output::hint("keep this file out of version control");
    Ok(())
}
