use async_trait::async_trait;
use aws_sdk_kms::{error::DisplayErrorContext, primitives::Blob, Client as KmsClient};

use crate::{Decryptor, RestoreError, RestoreResult};

pub struct KmsService {
    client: KmsClient,
}

impl KmsService {
    pub fn new(client: KmsClient) -> Self {
        Self { client }
    }

    pub fn region(&self) -> Option<&str> {
        self.client.config().region().map(|region| region.as_ref())
    }
}

#[async_trait]
impl Decryptor for KmsService {
    async fn decrypt(&self, key_id: &str, ciphertext: Vec<u8>) -> RestoreResult<Vec<u8>> {
        let output = self
            .client
            .decrypt()
            .key_id(key_id)
            .ciphertext_blob(Blob::new(ciphertext))
            .send()
            .await
            .map_err(|e| {
                RestoreError::KMSError(format!(
                    "Failed to decrypt with key {}: {}",
                    key_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        let plaintext = output
            .plaintext
            .ok_or_else(|| RestoreError::KMSError(format!("Key {} returned no plaintext", key_id)))?;

        Ok(plaintext.into_inner())
    }
}
