//! Command-line interface.

pub mod build;
pub mod completions;
pub mod keygen;
pub mod logging;
pub mod output;
pub mod show;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::cipher::CipherKind;
use crate::core::config::Config;
use crate::error::{ConfigError, Result};

/// secreg - collect secrets from config files into one encrypted registry.
#[derive(Parser)]
#[command(
    name = "secreg",
    about = "Collect secrets from config files into one encrypted registry",
    version
)]
pub struct Cli {
    /// Directory to scan for secrets files (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Verbose output on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `build`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Scan, merge and write the secrets registry
    Build(BuildArgs),

    /// Generate an encryption key file
    Keygen {
        /// Where to write the key
        #[arg(short, long, value_name = "KEY_FILE")]
        key_file: Option<PathBuf>,
        /// Key kind
        #[arg(long, value_name = "KIND")]
        cipher: Option<CipherKind>,
        /// Replace an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Print the registry, or one secret from it
    Show {
        /// Only print this key
        key: Option<String>,
        /// Key file used to open the registry
        #[arg(short, long, value_name = "KEY_FILE")]
        key_file: Option<PathBuf>,
        /// The registry was written without encryption
        #[arg(short = 'd', long)]
        disable_encryption: bool,
        /// Registry file to read
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags of the `build` command.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Path to the encryption key file (default: encryption_key.txt)
    #[arg(short, long, value_name = "KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Disable encryption of the secrets registry
    #[arg(short = 'd', long)]
    pub disable_encryption: bool,

    /// Only scan files with this extension, e.g. `.yaml`
    #[arg(short = 't', long, value_name = "EXT")]
    pub file_type: Option<String>,

    /// Registry file to write (default: secrets_registry.log)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Cipher for a newly generated key
    #[arg(long, value_name = "KIND")]
    pub cipher: Option<CipherKind>,
}

/// Resolved target directory and its configuration.
pub struct Context {
    pub dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Resolve `--dir` and load `.secreg.toml` from it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `dir` is not a directory, or
    /// any error from `Config::load`.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let dir = match dir {
            Some(d) if d.is_dir() => cwd.join(d),
            Some(d) => {
                return Err(ConfigError::InvalidValue {
                    field: "dir",
                    reason: format!("'{}' is not a directory", d.display()),
                }
                .into())
            }
            None => cwd,
        };
        let config = Config::load(&dir)?;
        Ok(Self { dir, config })
    }
}

/// Command-line paths are relative to the working directory.
pub(crate) fn cli_path(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns the first error from the selected command.
pub fn execute(cli: Cli) -> Result<()> {
    let command = cli
        .command
        .unwrap_or_else(|| Command::Build(BuildArgs::default()));

    if let Command::Completions { shell } = command {
        return completions::execute(shell);
    }

    let ctx = Context::load(cli.dir.as_deref())?;
    logging::init(cli.verbose, &ctx.config.logging)?;

    match command {
        Command::Build(args) => build::execute(&ctx, args),
        Command::Keygen {
            key_file,
            cipher,
            force,
        } => keygen::execute(&ctx, key_file, cipher, force),
        Command::Show {
            key,
            key_file,
            disable_encryption,
            output,
            json,
        } => show::execute(
            &ctx,
            show::ShowArgs {
                key,
                key_file,
                disable_encryption,
                output,
                json,
            },
        ),
        Command::Completions { .. } => Ok(()),
    }
}
