//! CLI commands

pub mod keygen;
pub mod open;
pub mod seal;

use crate::KeyArgs;
use anyhow::{bail, Context, Result};
use lifecore_core::SecretKey;
use std::io::Read;

/// Resolve the private key from `--private-key` or `--key-file`
pub fn load_secret_key(args: &KeyArgs) -> Result<SecretKey> {
    if let Some(value) = args.private_key.as_deref().filter(|v| !v.trim().is_empty()) {
        return SecretKey::from_base64(value.trim())
            .context("Private key is not a valid base64 X25519 key");
    }

    if let Some(path) = &args.key_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file {}", path.display()))?;
        return SecretKey::from_base64(contents.trim()).with_context(|| {
            format!("Key file {} does not hold a valid base64 X25519 key", path.display())
        });
    }

    bail!("No private key given (use --private-key, --key-file or SERVER_PRIV_B64)")
}

/// Message from the argument, or all of stdin
pub fn read_message(message: Option<String>) -> Result<Vec<u8>> {
    match message {
        Some(message) => Ok(message.into_bytes()),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read message from stdin")?;
            Ok(buf)
        }
    }
}
