//! Build command.

use crate::cli::{cli_path, output, BuildArgs, Context};
use crate::core::merge::ProcessEnv;
use crate::core::pipeline::{self, BuildOptions};
use crate::error::Result;

/// Scan the target directory and write the registry.
pub fn execute(ctx: &Context, args: BuildArgs) -> Result<()> {
    let mut options = BuildOptions::from_config(&ctx.dir, &ctx.config);
    if let Some(path) = args.key_file {
        options.key_file = cli_path(path)?;
    }
    if let Some(path) = args.output {
        options.output = cli_path(path)?;
    }
    if let Some(ext) = args.file_type.as_deref() {
        options.scan.restrict_to(ext)?;
    }
    if let Some(kind) = args.cipher {
        options.cipher = kind;
    }
    if args.disable_encryption {
        options.encrypt = false;
    }

    let report = pipeline::build(&options, &ProcessEnv)?;

    if report.key_created {
        output::success(&format!(
            "Encryption key generated and saved to {}",
            output::path(&options.key_file)
        ));
    }
    output::success(&format!(
        "registry written to {}",
        output::path(&report.output)
    ));
    output::kv("sources", report.sources.len());
    for name in &report.sources {
        output::list_item(name);
    }
    output::kv("entries", report.entries);
    if report.stats.from_env > 0 {
        output::kv("from env", report.stats.from_env);
    }
    if report.stats.dropped > 0 {
        output::kv("dropped", report.stats.dropped);
    }

    match &report.key_fingerprint {
        Some(fp) => output::kv("key", fp),
        None => {
            output::warn("registry stored WITHOUT encryption");
            output::hint("delete it after reading, or build without -d");
        }
    }
    if report.gitignore_updated {
        output::dimmed(".gitignore updated");
    }
    Ok(())
}
