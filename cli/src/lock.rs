use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::error::Result;
use crate::utils::{password, read_input, write_output};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to an RSA PRIVATE KEY or PRIVATE KEY file, `-` for stdin
    pub(crate) file: String,

    /// Password to encrypt the key with
    #[arg(env = "SIGKEY_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,

    /// Write the ENCRYPTED SIGSTORE PRIVATE KEY to this file instead of stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let password = password(config.password)?;
    let input = String::from_utf8(read_input(&config.file)?)?;
    debug!(file = %config.file, len = input.len(), "read private key");

    let pem = sigkey_unlock::lock(&input, password.as_bytes())?;
    write_output(config.output.as_deref(), &pem)
}
