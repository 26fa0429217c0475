use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::error::Result;
use crate::utils::{password, read_input, write_output};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the ENCRYPTED SIGSTORE PRIVATE KEY file, `-` for stdin
    pub(crate) file: String,

    /// Password the key was encrypted with
    #[arg(env = "SIGKEY_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,

    /// Write the RSA PRIVATE KEY to this file instead of stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let password = password(config.password)?;
    let input = read_input(&config.file)?;
    debug!(file = %config.file, len = input.len(), "read encrypted key");

    let pem = sigkey_unlock::unlock(&input, password.as_bytes())?;
    write_output(config.output.as_deref(), &pem)
}
