use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::parse_bool;

/// Invocation payload. Every field is optional; anything left out falls back
/// to the matching environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestoreEvent {
    pub aws_region: Option<String>,
    #[serde(alias = "cognitoUserPoolID")]
    pub cognito_user_pool_id: Option<String>,
    pub cognito_region: Option<String>,
    pub s3_bucket_name: Option<String>,
    pub s3_bucket_region: Option<String>,
    pub backup_dir_path: Option<String>,
    pub kms_key_id: Option<String>,
    pub kms_key_region: Option<String>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub restore_users: Option<bool>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub restore_groups: Option<bool>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub clean_up_before_restore: Option<bool>,
}

/// Accepts `true`/`false`, boolean strings, or anything else as "not set".
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::String(raw)) => parse_bool(&raw),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResponse {
    pub answer: String,
}

impl RestoreResponse {
    pub const FAILURE_MESSAGE: &'static str = "Failed to restore Cognito user pool";

    pub fn success(user_pool_id: &str, summary: &crate::RestoreSummary) -> Self {
        Self {
            answer: format!("Cognito user pool {} has been restored successfully ({})", user_pool_id, summary),
        }
    }
}

/// Backup document, shaped like a Cognito `ListUsers` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserBackup {
    #[serde(default, alias = "users", deserialize_with = "null_as_empty")]
    pub users: Vec<BackupUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BackupUser {
    #[serde(default, alias = "username")]
    pub username: Option<String>,
    #[serde(default, alias = "attributes", deserialize_with = "null_as_empty")]
    pub attributes: Vec<UserAttribute>,
}

impl BackupUser {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .and_then(|attribute| attribute.value.as_deref())
    }

    /// Name used in log lines; falls back to a placeholder for exports without one.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("<unknown>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    #[serde(alias = "name")]
    pub name: String,
    #[serde(default, alias = "value")]
    pub value: Option<String>,
}

impl UserAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Arguments of a single `AdminCreateUser` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub attributes: Vec<UserAttribute>,
}
