//! Key generation

use super::load_secret_key;
use crate::KeyArgs;
use anyhow::{Context, Result};
use lifecore_core::KeyPair;

/// Generate a server key pair and print it in environment-file form
pub fn execute() -> Result<()> {
    let keypair = KeyPair::generate().context("Failed to generate key pair")?;
    print!("{}", render(&keypair));
    Ok(())
}

/// Print the public half of a private key
pub fn pubkey(args: &KeyArgs) -> Result<()> {
    let secret_key = load_secret_key(args)?;
    println!("SERVER_PUBLIC_KEY_B64={}", secret_key.public_key().to_base64());
    Ok(())
}

fn render(keypair: &KeyPair) -> String {
    format!(
        "SERVER_PUBLIC_KEY_B64={}\nSERVER_PRIVATE_KEY_B64={}\n",
        keypair.public_key.to_base64(),
        keypair.secret_key.to_base64()
    )
}
