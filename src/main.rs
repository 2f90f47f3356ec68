//! secreg - collects secrets from config files into one encrypted registry.

use clap::Parser;

use secreg::cli::{execute, output, Cli};
use secreg::error::{CipherError, Error, KeyError};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Key(KeyError::NotFound(_)) => Some("run: secreg keygen, or secreg build"),
            Error::Key(KeyError::AlreadyExists(_)) => Some("pass --force to replace it"),
            Error::Cipher(CipherError::Decryption(_)) => {
                Some("check that --key-file is the key the registry was built with")
            }
            Error::Source(_) => Some("fix or rename the source file, then build again"),
            Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                Some("run: secreg build")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
