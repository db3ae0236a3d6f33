use std::collections::HashMap;

use tracing::warn;

use crate::{RestoreError, RestoreEvent, RestoreResult};

/// Immutable copy of the process environment taken once per invocation.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the variable if it is set to a non-empty value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Parses the boolean spellings accepted in environment variables and payload strings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Settings for one restore invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreConfig {
    pub aws_region: String,
    pub cognito_user_pool_id: String,
    pub cognito_region: String,
    pub s3_bucket_name: String,
    pub s3_bucket_region: String,
    pub backup_dir_path: String,
    pub kms_key_id: Option<String>,
    pub kms_region: String,
    pub restore_users: bool,
    pub restore_groups: bool,
    pub cleanup_before_restore: bool,
}

struct TextRule {
    field: &'static str,
    env_var: &'static str,
    payload: fn(&RestoreEvent) -> Option<&str>,
}

struct FlagRule {
    field: &'static str,
    env_var: &'static str,
    payload: fn(&RestoreEvent) -> Option<bool>,
}

const AWS_REGION: TextRule = TextRule {
    field: "awsRegion",
    env_var: "AWS_REGION",
    payload: |event| event.aws_region.as_deref(),
};

const COGNITO_USER_POOL_ID: TextRule = TextRule {
    field: "cognitoUserPoolId",
    env_var: "COGNITO_USER_POOL_ID",
    payload: |event| event.cognito_user_pool_id.as_deref(),
};

const COGNITO_REGION: TextRule = TextRule {
    field: "cognitoRegion",
    env_var: "COGNITO_REGION",
    payload: |event| event.cognito_region.as_deref(),
};

const S3_BUCKET_NAME: TextRule = TextRule {
    field: "s3BucketName",
    env_var: "S3_BUCKET_NAME",
    payload: |event| event.s3_bucket_name.as_deref(),
};

const S3_BUCKET_REGION: TextRule = TextRule {
    field: "s3BucketRegion",
    env_var: "S3_BUCKET_REGION",
    payload: |event| event.s3_bucket_region.as_deref(),
};

const BACKUP_DIR_PATH: TextRule = TextRule {
    field: "backupDirPath",
    env_var: "BACKUP_DIR_PATH",
    payload: |event| event.backup_dir_path.as_deref(),
};

const KMS_KEY_ID: TextRule = TextRule {
    field: "kmsKeyId",
    env_var: "KMS_KEY_ID",
    payload: |event| event.kms_key_id.as_deref(),
};

const KMS_KEY_REGION: TextRule = TextRule {
    field: "kmsKeyRegion",
    env_var: "KMS_KEY_REGION",
    payload: |event| event.kms_key_region.as_deref(),
};

const RESTORE_USERS: FlagRule = FlagRule {
    field: "restoreUsers",
    env_var: "RESTORE_USERS",
    payload: |event| event.restore_users,
};

const RESTORE_GROUPS: FlagRule = FlagRule {
    field: "restoreGroups",
    env_var: "RESTORE_GROUPS",
    payload: |event| event.restore_groups,
};

const CLEANUP_BEFORE_RESTORE: FlagRule = FlagRule {
    field: "cleanUpBeforeRestore",
    env_var: "CLEANUP_BEFORE_RESTORE",
    payload: |event| event.clean_up_before_restore,
};

impl TextRule {
    /// Environment first, then a non-empty payload value on top of it.
    fn lookup(&self, env: &EnvSnapshot, event: Option<&RestoreEvent>) -> Option<String> {
        let mut value = env.get(self.env_var).map(str::to_string);
        if value.is_none() {
            warn!("Environment variable {} is empty", self.env_var);
        }

        if let Some(event) = event {
            match (self.payload)(event).filter(|v| !v.is_empty()) {
                Some(from_event) => value = Some(from_event.to_string()),
                None => warn!("Event contains empty {} variable", self.field),
            }
        }

        value
    }

    /// Same precedence as `lookup`, without warnings; for fields that may be absent.
    fn optional(&self, env: &EnvSnapshot, event: Option<&RestoreEvent>) -> Option<String> {
        event
            .and_then(self.payload)
            .filter(|value| !value.is_empty())
            .or_else(|| env.get(self.env_var))
            .map(str::to_string)
    }

    fn require(&self, env: &EnvSnapshot, event: Option<&RestoreEvent>) -> RestoreResult<String> {
        self.lookup(env, event).ok_or_else(|| {
            RestoreError::ConfigurationError(format!(
                "{} is empty; configure it via '{}' env variable or pass it in the event body",
                self.field, self.env_var
            ))
        })
    }
}

impl FlagRule {
    fn resolve(&self, env: &EnvSnapshot, event: Option<&RestoreEvent>) -> RestoreResult<bool> {
        let mut value = match env.get(self.env_var) {
            Some(raw) => Some(parse_bool(raw).ok_or_else(|| {
                RestoreError::ConfigurationError(format!(
                    "Could not parse '{}' variable: invalid boolean '{}'",
                    self.env_var, raw
                ))
            })?),
            None => None,
        };

        if let Some(from_event) = event.and_then(self.payload) {
            value = Some(from_event);
        }

        Ok(value.unwrap_or_else(|| {
            warn!("{} is not specified; default value 'false' will be used", self.field);
            false
        }))
    }
}

impl RestoreConfig {
    /// Merge the environment with an optional payload; payload values win.
    pub fn resolve(env: &EnvSnapshot, event: Option<&RestoreEvent>) -> RestoreResult<Self> {
        let aws_region = AWS_REGION.require(env, event)?;
        let cognito_user_pool_id = COGNITO_USER_POOL_ID.require(env, event)?;
        let cognito_region = COGNITO_REGION.require(env, event)?;
        let s3_bucket_name = S3_BUCKET_NAME.require(env, event)?;
        let s3_bucket_region = S3_BUCKET_REGION.require(env, event)?;
        let backup_dir_path = BACKUP_DIR_PATH.require(env, event)?;

        let kms_key_id = KMS_KEY_ID.optional(env, event);
        let kms_region = KMS_KEY_REGION
            .optional(env, event)
            .unwrap_or_else(|| aws_region.clone());

        let restore_users = RESTORE_USERS.resolve(env, event)?;
        let restore_groups = RESTORE_GROUPS.resolve(env, event)?;
        let cleanup_before_restore = CLEANUP_BEFORE_RESTORE.resolve(env, event)?;

        if cleanup_before_restore {
            warn!(
                "Pay attention that cleanup before restore is enabled. All users of {} userpool will be deleted before restore",
                cognito_user_pool_id
            );
        }

        Ok(Self {
            aws_region,
            cognito_user_pool_id,
            cognito_region,
            s3_bucket_name,
            s3_bucket_region,
            backup_dir_path,
            kms_key_id,
            kms_region,
            restore_users,
            restore_groups,
            cleanup_before_restore,
        })
    }
}
