use clap::{ArgAction, Parser, Subcommand};

mod error;
mod lock;
mod logging;
mod unlock;
mod utils;

use error::Result;

#[derive(Parser)]
#[command(name = "sigkey")]
#[command(about = "Unlock and lock encrypted sigstore private keys", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt an ENCRYPTED SIGSTORE PRIVATE KEY into an RSA PRIVATE KEY
    Unlock {
        #[command(flatten)]
        config: unlock::Config,
    },
    /// Encrypt an RSA PRIVATE KEY or PRIVATE KEY into an ENCRYPTED SIGSTORE PRIVATE KEY
    Lock {
        #[command(flatten)]
        config: lock::Config,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Unlock { config } => unlock::execute(config),
        Commands::Lock { config } => lock::execute(config),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
