//! Show command.

use std::path::PathBuf;

use crate::cli::{cli_path, output, Context};
use crate::core::codec;
use crate::core::pipeline::{self, ReadOptions};
use crate::error::{Error, Result};

/// Flags of the `show` command.
pub struct ShowArgs {
    pub key: Option<String>,
    pub key_file: Option<PathBuf>,
    pub disable_encryption: bool,
    pub output: Option<PathBuf>,
    pub json: bool,
}

/// Read the registry back and print it.
pub fn execute(ctx: &Context, args: ShowArgs) -> Result<()> {
    let mut options = ReadOptions::from_config(&ctx.config);
    if let Some(path) = args.key_file {
        options.key_file = cli_path(path)?;
    }
    if let Some(path) = args.output {
        options.output = cli_path(path)?;
    }
    if args.disable_encryption {
        options.encrypted = false;
    }

    let registry = pipeline::read(&options)?;

    if let Some(key) = args.key {
        let value = registry
            .get(&key)
            .ok_or_else(|| Error::SecretNotFound(key.clone()))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", codec::encode(value));
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry)?);
    } else if registry.is_empty() {
        output::dimmed("registry is empty");
    } else {
        for (key, value) in registry.iter() {
            println!("{}: {}", output::key(key), codec::encode(value));
        }
    }
    Ok(())
}
