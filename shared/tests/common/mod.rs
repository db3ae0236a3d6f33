// In-memory stand-ins for Cognito, S3 and KMS shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;
use restore_shared::{
    BackupStore, CreateUserRequest, Decryptor, RestoreError, RestoreResult, UserDirectory,
};

/// Ordered record of every downstream call, shared between fakes.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Default)]
pub struct MemoryDirectory {
    existing: Mutex<Vec<String>>,
    failing_deletes: HashSet<String>,
    failing_creates: HashSet<String>,
    deleted: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, CreateUserRequest)>>,
    timeline: Mutex<Vec<(String, Instant)>>,
    log: CallLog,
}

impl MemoryDirectory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn with_existing(self, usernames: &[&str]) -> Self {
        *self.existing.lock().unwrap() = usernames.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn failing_delete(mut self, username: &str) -> Self {
        self.failing_deletes.insert(username.to_string());
        self
    }

    pub fn failing_create(mut self, username: &str) -> Self {
        self.failing_creates.insert(username.to_string());
        self
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, CreateUserRequest)> {
        self.created.lock().unwrap().clone()
    }

    /// Calls paired with the (tokio) clock reading at the time they were made.
    pub fn timeline(&self) -> Vec<(String, Instant)> {
        self.timeline.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.timeline.lock().unwrap().push((call.clone(), Instant::now()));
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn list_usernames(&self, user_pool_id: &str) -> RestoreResult<Vec<String>> {
        self.record(format!("list-users {}", user_pool_id));
        Ok(self.existing.lock().unwrap().clone())
    }

    async fn delete_user(&self, user_pool_id: &str, username: &str) -> RestoreResult<()> {
        self.record(format!("delete-user {} {}", user_pool_id, username));
        if self.failing_deletes.contains(username) {
            return Err(RestoreError::CognitoError(format!("UserNotFoundException: {}", username)));
        }
        self.existing.lock().unwrap().retain(|existing| existing != username);
        self.deleted.lock().unwrap().push(username.to_string());
        Ok(())
    }

    async fn create_user(&self, user_pool_id: &str, request: &CreateUserRequest) -> RestoreResult<()> {
        let username = request.username.clone().ok_or_else(|| {
            RestoreError::ValidationError("User has no email attribute to use as username".to_string())
        })?;
        self.record(format!("create-user {} {}", user_pool_id, username));
        if self.failing_creates.contains(&username) {
            return Err(RestoreError::CognitoError(format!("UsernameExistsException: {}", username)));
        }
        self.created.lock().unwrap().push((user_pool_id.to_string(), request.clone()));
        Ok(())
    }
}

pub struct MemoryStore {
    objects: HashMap<(String, String), Vec<u8>>,
    log: CallLog,
}

impl MemoryStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            objects: HashMap::new(),
            log,
        }
    }

    pub fn with_object(mut self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Self {
        self.objects.insert((bucket.to_string(), key.to_string()), data.into());
        self
    }
}

#[async_trait]
impl BackupStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> RestoreResult<Vec<u8>> {
        self.log.lock().unwrap().push(format!("get-object {} {}", bucket, key));
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| RestoreError::S3Error(format!("NoSuchKey: {}", key)))
    }
}

/// XORs every byte with a mask; only accepts the key id it was built with.
pub struct XorDecryptor {
    key_id: String,
    mask: u8,
    log: CallLog,
}

impl XorDecryptor {
    pub fn new(key_id: &str, mask: u8, log: CallLog) -> Self {
        Self {
            key_id: key_id.to_string(),
            mask,
            log,
        }
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        plaintext.iter().map(|byte| byte ^ self.mask).collect()
    }
}

#[async_trait]
impl Decryptor for XorDecryptor {
    async fn decrypt(&self, key_id: &str, ciphertext: Vec<u8>) -> RestoreResult<Vec<u8>> {
        self.log.lock().unwrap().push(format!("decrypt {}", key_id));
        if key_id != self.key_id {
            return Err(RestoreError::KMSError(format!("IncorrectKeyException: {}", key_id)));
        }
        Ok(self.encrypt(&ciphertext))
    }
}
