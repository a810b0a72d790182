//! Server configuration from the environment

use anyhow::{bail, Context, Result};
use lifecore_core::{KeyPair, SecretKey};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Storage directory value that selects the in-memory store
pub const MEMORY_STORAGE: &str = ":memory:";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORAGE_DIR: &str = "received";
const DEFAULT_KEY_FILE: &str = "server_priv.b64";

/// Where the server private key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Env,
    File(PathBuf),
    NotConfigured,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Env => write!(f, "SERVER_PRIV_B64"),
            KeySource::File(path) => write!(f, "file {}", path.display()),
            KeySource::NotConfigured => write!(f, "not configured"),
        }
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Directory for received payloads, or `:memory:`
    pub storage_dir: String,
    /// Return decrypted plaintext in `/receive_box` responses
    pub echo_plaintext: bool,
    /// Server identity, if a private key was provisioned
    pub identity: Option<KeyPair>,
    pub key_source: KeySource,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_address = var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {}", port))?,
            None => DEFAULT_PORT,
        };

        let storage_dir = var("STORAGE_DIR").unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string());

        let echo_plaintext = match var("ECHO_PLAINTEXT") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("Invalid ECHO_PLAINTEXT: {}", value))?,
            None => false,
        };

        let key_file = var("SERVER_PRIV_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_FILE));

        let (secret_key, key_source) = load_private_key(var("SERVER_PRIV_B64"), key_file)?;

        Ok(Self {
            bind_address,
            port,
            storage_dir,
            echo_plaintext,
            identity: secret_key.map(KeyPair::from_secret_key),
            key_source,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn uses_memory_storage(&self) -> bool {
        self.storage_dir == MEMORY_STORAGE
    }
}

/// Load the private key. The environment value wins over the key file; a
/// missing or empty file means no key is configured.
fn load_private_key(
    env_value: Option<String>,
    key_file: PathBuf,
) -> Result<(Option<SecretKey>, KeySource)> {
    if let Some(value) = env_value {
        let key = SecretKey::from_base64(value.trim())
            .context("SERVER_PRIV_B64 is not a valid base64 X25519 private key")?;
        return Ok((Some(key), KeySource::Env));
    }

    let contents = match std::fs::read_to_string(&key_file) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No private key file at {}", key_file.display());
            return Ok((None, KeySource::NotConfigured));
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read private key file {}", key_file.display())
            })
        }
    };

    let encoded = contents.trim();
    if encoded.is_empty() {
        warn!("Private key file {} is empty", key_file.display());
        return Ok((None, KeySource::NotConfigured));
    }

    let key = SecretKey::from_base64(encoded).with_context(|| {
        format!(
            "Private key file {} does not hold a valid base64 X25519 private key",
            key_file.display()
        )
    })?;

    Ok((Some(key), KeySource::File(key_file)))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}
