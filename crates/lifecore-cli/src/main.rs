//! LifeCore CLI
//!
//! Provisions the relay's key pair and acts as a client: seal a message for
//! the relay, send it, or open a captured envelope offline.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use lifecore_core::PRIORITY_MEDIUM;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "lifecore")]
#[command(author, version, about = "LifeCore - encrypted message relay tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the server key pair
    Keygen,

    /// Print the public key belonging to a private key
    Pubkey {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Seal a message for the server and print the request body
    Seal {
        /// Server public key (base64)
        #[arg(long, env = "LIFECORE_SERVER_PK")]
        server_pk: String,

        /// Message text (read from stdin if omitted)
        message: Option<String>,
    },

    /// Seal a message and POST it to the relay
    Send {
        /// Server public key (base64)
        #[arg(long, env = "LIFECORE_SERVER_PK")]
        server_pk: String,

        /// Relay endpoint (defaults to /receive_box, or /receive with --store)
        #[arg(long, env = "LIFECORE_URL")]
        url: Option<String>,

        /// Post to the store-only endpoint instead of having the relay open it
        #[arg(long)]
        store: bool,

        /// Messenger priority, 1 (high) to 3 (low); default 2
        #[arg(long, requires = "store", value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: Option<u8>,

        /// Message text (read from stdin if omitted)
        message: Option<String>,
    },

    /// Open a `{message, sender_pk}` JSON object with the server key
    Open {
        #[command(flatten)]
        key: KeyArgs,

        /// File holding the JSON object (read from stdin if omitted)
        file: Option<PathBuf>,
    },
}

/// Where to read a private key from. The value wins over the file.
#[derive(clap::Args)]
pub struct KeyArgs {
    /// Private key (base64)
    #[arg(long, env = "SERVER_PRIV_B64", hide_env_values = true)]
    private_key: Option<String>,

    /// File holding the base64 private key
    #[arg(long, env = "SERVER_PRIV_FILE")]
    key_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries command output
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "lifecore=debug,lifecore_core=debug"
        } else {
            "lifecore=warn"
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = match cli.command {
        Commands::Keygen => commands::keygen::execute(),
        Commands::Pubkey { key } => commands::keygen::pubkey(&key),
        Commands::Seal { server_pk, message } => commands::seal::execute(&server_pk, message),
        Commands::Send {
            server_pk,
            url,
            store,
            priority,
            message,
        } => {
            let priority = store.then(|| priority.unwrap_or(PRIORITY_MEDIUM));
            commands::seal::send(&server_pk, url.as_deref(), priority, message).await
        }
        Commands::Open { key, file } => commands::open::execute(&key, file.as_deref()),
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
