use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::{
    error::DisplayErrorContext, types::AttributeType, Client as CognitoClient,
};

use crate::{CreateUserRequest, RestoreError, RestoreResult, UserDirectory};

pub struct CognitoService {
    client: CognitoClient,
}

impl CognitoService {
    pub fn new(client: CognitoClient) -> Self {
        Self { client }
    }

    pub fn region(&self) -> Option<&str> {
        self.client.config().region().map(|region| region.as_ref())
    }
}

#[async_trait]
impl UserDirectory for CognitoService {
    async fn list_usernames(&self, user_pool_id: &str) -> RestoreResult<Vec<String>> {
        let mut usernames = Vec::new();
        let mut pagination_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_users()
                .user_pool_id(user_pool_id)
                .set_pagination_token(pagination_token.take())
                .send()
                .await
                .map_err(|e| {
                    RestoreError::CognitoError(format!(
                        "Failed to list users of {}: {}",
                        user_pool_id,
                        DisplayErrorContext(&e)
                    ))
                })?;

            usernames.extend(
                output
                    .users()
                    .iter()
                    .filter_map(|user| user.username())
                    .map(str::to_string),
            );

            match output.pagination_token() {
                Some(token) if !token.is_empty() => pagination_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!("Listed {} users in {}", usernames.len(), user_pool_id);
        Ok(usernames)
    }

    async fn delete_user(&self, user_pool_id: &str, username: &str) -> RestoreResult<()> {
        self.client
            .admin_delete_user()
            .user_pool_id(user_pool_id)
            .username(username)
            .send()
            .await
            .map_err(|e| {
                RestoreError::CognitoError(format!(
                    "Failed to delete user {}: {}",
                    username,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    async fn create_user(&self, user_pool_id: &str, request: &CreateUserRequest) -> RestoreResult<()> {
        let username = request.username.as_deref().ok_or_else(|| {
            RestoreError::ValidationError("User has no email attribute to use as username".to_string())
        })?;

        let attributes = request
            .attributes
            .iter()
            .map(|attribute| {
                AttributeType::builder()
                    .name(&attribute.name)
                    .set_value(attribute.value.clone())
                    .build()
                    .map_err(|e| RestoreError::InternalError(format!("Failed to build attribute: {}", e)))
            })
            .collect::<RestoreResult<Vec<_>>>()?;

        self.client
            .admin_create_user()
            .user_pool_id(user_pool_id)
            .username(username)
            .set_user_attributes(Some(attributes))
            .send()
            .await
            .map_err(|e| {
                RestoreError::CognitoError(format!(
                    "Failed to create user {}: {}",
                    username,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}
