//! Relay service: validate, open, persist

use chrono::Utc;
use lifecore_core::ports::PayloadStore;
use lifecore_core::{
    envelope, KeyPair, OkResponse, PublicKey, RelayError, RelayRequest, StoredPayload,
    ValidationError, WireEnvelope,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ReceiveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

pub struct RelayService {
    identity: Option<KeyPair>,
    store: Arc<dyn PayloadStore>,
    echo_plaintext: bool,
}

impl RelayService {
    /// `identity` is the server key pair; without one every encrypted
    /// request fails with [`RelayError::KeyNotConfigured`].
    pub fn new(identity: Option<KeyPair>, store: Arc<dyn PayloadStore>) -> Self {
        Self {
            identity,
            store,
            echo_plaintext: false,
        }
    }

    pub fn with_echo_plaintext(mut self, echo_plaintext: bool) -> Self {
        self.echo_plaintext = echo_plaintext;
        self
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.identity.as_ref().map(|kp| &kp.public_key)
    }

    pub fn is_key_configured(&self) -> bool {
        self.identity.is_some()
    }

    /// Store-only path: persist the body as received
    pub async fn receive(&self, body: Value) -> Result<OkResponse, ReceiveError> {
        self.handle(RelayRequest::store(body)?).await
    }

    /// Encrypted path. The key check comes before validation so that a
    /// misconfigured relay reports the same error for every request.
    pub async fn receive_box(&self, body: &Value) -> Result<OkResponse, ReceiveError> {
        if self.identity.is_none() {
            return Err(RelayError::KeyNotConfigured.into());
        }
        self.handle(RelayRequest::boxed(body)?).await
    }

    /// Process a validated request
    pub async fn handle(&self, request: RelayRequest) -> Result<OkResponse, ReceiveError> {
        match request {
            RelayRequest::Store(payload) => {
                let record = StoredPayload::new(payload);
                let location = self.store.store_payload(&record).await?;
                info!("Stored ciphertext payload -> {}", location);
                Ok(OkResponse::new())
            }
            RelayRequest::Boxed(wire) => self.open_and_store(&wire).await,
        }
    }

    async fn open_and_store(&self, wire: &WireEnvelope) -> Result<OkResponse, ReceiveError> {
        let identity = self.identity.as_ref().ok_or(RelayError::KeyNotConfigured)?;

        let plaintext = envelope::open(wire, &identity.secret_key).map_err(|e| {
            warn!("Decrypt error: {}", e);
            e
        })?;

        let location = self
            .store
            .store_plaintext(Utc::now(), &plaintext)
            .await
            .map_err(|e| {
                warn!("Failed to store decrypted message: {}", e);
                e
            })?;
        info!("Decrypted message from {} -> {}", wire.sender_pk, location);

        if self.echo_plaintext {
            Ok(OkResponse::with_plaintext(
                String::from_utf8_lossy(&plaintext).into_owned(),
            ))
        } else {
            Ok(OkResponse::new())
        }
    }
}
