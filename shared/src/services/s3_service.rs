use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, Client as S3Client};

use crate::{BackupStore, RestoreError, RestoreResult};

pub struct S3Service {
    client: S3Client,
}

impl S3Service {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    pub fn region(&self) -> Option<&str> {
        self.client.config().region().map(|region| region.as_ref())
    }
}

#[async_trait]
impl BackupStore for S3Service {
    async fn get_object(&self, bucket: &str, key: &str) -> RestoreResult<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {} object data from {} bucket", key, bucket);
                RestoreError::S3Error(format!(
                    "Failed to get {} from {}: {}",
                    key,
                    bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        let data = object.body.collect().await.map_err(|e| {
            tracing::error!("Failed to convert {} object data to bytes", key);
            RestoreError::S3Error(format!("Failed to read {} body: {}", key, e))
        })?;

        Ok(data.into_bytes().to_vec())
    }
}
