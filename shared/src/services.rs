pub mod cognito_service;
pub mod kms_service;
pub mod s3_service;

pub use cognito_service::*;
pub use kms_service::*;
pub use s3_service::*;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::{CreateUserRequest, RestoreResult};

/// The user pool being restored into.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every username in the pool, across all result pages.
    async fn list_usernames(&self, user_pool_id: &str) -> RestoreResult<Vec<String>>;

    async fn delete_user(&self, user_pool_id: &str, username: &str) -> RestoreResult<()>;

    async fn create_user(&self, user_pool_id: &str, request: &CreateUserRequest) -> RestoreResult<()>;
}

/// Object storage holding the backup files.
#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> RestoreResult<Vec<u8>>;
}

#[async_trait]
pub trait Decryptor: Send + Sync {
    async fn decrypt(&self, key_id: &str, ciphertext: Vec<u8>) -> RestoreResult<Vec<u8>>;
}

/// Loads the default credential chain pinned to a single region.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}
