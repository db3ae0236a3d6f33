use std::sync::Arc;

use tracing::debug;

use crate::{BackupStore, BackupUser, Decryptor, RestoreResult, UserBackup};

pub const USERS_BACKUP_FILE: &str = "users.json";

/// Location of the users export inside the backup bucket. The prefix is used
/// verbatim; S3 keys are opaque, so a trailing `/` yields `prefix//users.json`.
pub fn backup_object_key(backup_dir_path: &str) -> String {
    format!("{}/{}", backup_dir_path, USERS_BACKUP_FILE)
}

/// Fetches the users export, decrypts it when a key is configured and parses it.
pub struct BackupFetcher {
    store: Arc<dyn BackupStore>,
    decryption: Option<(Arc<dyn Decryptor>, String)>,
}

impl BackupFetcher {
    pub fn new(store: Arc<dyn BackupStore>) -> Self {
        Self {
            store,
            decryption: None,
        }
    }

    pub fn with_decryption(mut self, decryptor: Arc<dyn Decryptor>, key_id: impl Into<String>) -> Self {
        self.decryption = Some((decryptor, key_id.into()));
        self
    }

    pub async fn fetch_users(&self, bucket: &str, backup_dir_path: &str) -> RestoreResult<Vec<BackupUser>> {
        let key = backup_object_key(backup_dir_path);

        let mut data = self.store.get_object(bucket, &key).await?;
        debug!("{} data has been received successfully from {}", key, bucket);

        if let Some((decryptor, key_id)) = &self.decryption {
            data = decryptor.decrypt(key_id, data).await?;
            debug!("{} data has been decrypted with {}", key, key_id);
        }

        let backup: UserBackup = serde_json::from_slice(&data)?;
        debug!("{} users have been unmarshalled from {}", backup.users.len(), key);

        Ok(backup.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_object_key() {
        assert_eq!(backup_object_key("D"), "D/users.json");
        assert_eq!(backup_object_key("2023-01-19T9:00:00Z/"), "2023-01-19T9:00:00Z//users.json");
        assert_eq!(backup_object_key("daily/us-west-2_test"), "daily/us-west-2_test/users.json");
    }
}
