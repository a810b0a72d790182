//! Seal and send messages to the relay

use super::read_message;
use anyhow::{Context, Result};
use colored::Colorize;
use lifecore_core::{Envelope, PrioritizedEnvelope, PublicKey, WireEnvelope};
use serde_json::Value;
use tracing::debug;

const DEFAULT_BOX_URL: &str = "http://localhost:3000/receive_box";
const DEFAULT_STORE_URL: &str = "http://localhost:3000/receive";

/// Seal for `server_pk` with a fresh ephemeral key
fn seal(server_pk: &str, plaintext: &[u8]) -> Result<WireEnvelope> {
    let server_pk = PublicKey::from_base64(server_pk.trim())
        .context("Server public key is not a valid base64 X25519 key")?;
    let envelope = Envelope::build(plaintext, &server_pk).context("Failed to seal message")?;
    Ok(envelope.to_wire())
}

/// Print the request body without sending it
pub fn execute(server_pk: &str, message: Option<String>) -> Result<()> {
    let plaintext = read_message(message)?;
    let wire = seal(server_pk, &plaintext)?;
    println!("{}", serde_json::to_string(&wire)?);
    Ok(())
}

/// Body and default endpoint. With a priority the message goes to the
/// store-only endpoint tagged for the messenger queue.
fn request(wire: WireEnvelope, priority: Option<u8>) -> Result<(Value, &'static str)> {
    Ok(match priority {
        Some(priority) => (
            serde_json::to_value(PrioritizedEnvelope {
                envelope: wire,
                priority,
            })?,
            DEFAULT_STORE_URL,
        ),
        None => (serde_json::to_value(wire)?, DEFAULT_BOX_URL),
    })
}

/// Seal and POST to the relay
pub async fn send(
    server_pk: &str,
    url: Option<&str>,
    priority: Option<u8>,
    message: Option<String>,
) -> Result<()> {
    let plaintext = read_message(message)?;
    let wire = seal(server_pk, &plaintext)?;
    let (body, default_url) = request(wire, priority)?;
    let url = url.unwrap_or(default_url);
    debug!("Sending {} byte message to {}", plaintext.len(), url);

    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("Failed to send message to {}", url))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_success() {
        println!("{} Server response status: {}", "✓ Sent.".green(), status);
    } else {
        println!("{} Server response status: {}", "✗ Rejected.".red(), status);
    }
    if !body.is_empty() {
        println!("{}", body.dimmed());
    }

    if !status.is_success() {
        anyhow::bail!("Relay returned {}", status);
    }
    Ok(())
}
