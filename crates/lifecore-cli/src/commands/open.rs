//! Offline decryption of captured envelopes

use super::load_secret_key;
use crate::KeyArgs;
use anyhow::{Context, Result};
use lifecore_core::{envelope, RelayRequest, SecretKey};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;

pub fn execute(args: &KeyArgs, file: Option<&Path>) -> Result<()> {
    let secret_key = load_secret_key(args)?;

    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read envelope from stdin")?;
            buf
        }
    };

    let plaintext = open_json(&input, &secret_key)?;
    let mut stdout = std::io::stdout();
    stdout.write_all(&plaintext)?;
    stdout.flush()?;
    Ok(())
}

/// Open a `{message, sender_pk}` JSON object
fn open_json(input: &str, secret_key: &SecretKey) -> Result<Vec<u8>> {
    let body: Value = serde_json::from_str(input).context("Input is not JSON")?;

    let wire = match RelayRequest::boxed(&body).context("Input is not an envelope")? {
        RelayRequest::Boxed(wire) => wire,
        RelayRequest::Store(_) => anyhow::bail!("Input is not an envelope"),
    };

    envelope::open(&wire, secret_key).context("Failed to open envelope")
}
