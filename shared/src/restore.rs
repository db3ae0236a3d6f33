use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::{BackupFetcher, BackupUser, CreateUserRequest, RestoreConfig, RestoreResult, UserDirectory};

/// Attribute generated by Cognito; resubmitting it is rejected.
pub const SUB_ATTRIBUTE: &str = "sub";
/// Attribute whose value becomes the username of the recreated user.
pub const EMAIL_ATTRIBUTE: &str = "email";

/// Pause after a bulk delete so the pool settles before users are recreated.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Build the create call for one exported user.
pub fn map_user(user: &BackupUser) -> CreateUserRequest {
    CreateUserRequest {
        username: user.attribute(EMAIL_ATTRIBUTE).map(str::to_string),
        attributes: user
            .attributes
            .iter()
            .filter(|attribute| attribute.name != SUB_ATTRIBUTE)
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub deleted: usize,
    pub delete_failures: usize,
    pub created: usize,
}

impl fmt::Display for RestoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deleted: {}, failed deletes: {}, created: {}",
            self.deleted, self.delete_failures, self.created
        )
    }
}

pub struct RestoreExecutor {
    directory: Arc<dyn UserDirectory>,
    backups: BackupFetcher,
    settle_delay: Duration,
}

impl RestoreExecutor {
    pub fn new(directory: Arc<dyn UserDirectory>, backups: BackupFetcher) -> Self {
        Self {
            directory,
            backups,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Runs the enabled phases. The backup is read before anything is deleted.
    pub async fn execute(&self, config: &RestoreConfig) -> RestoreResult<RestoreSummary> {
        let mut summary = RestoreSummary::default();
        let pool = config.cognito_user_pool_id.as_str();

        let users = if config.restore_users {
            let users = self
                .backups
                .fetch_users(&config.s3_bucket_name, &config.backup_dir_path)
                .await?;
            Some(users)
        } else {
            None
        };

        if config.cleanup_before_restore {
            self.cleanup(pool, &mut summary).await?;
        }

        if let Some(users) = users {
            self.restore_users(pool, &users, &mut summary).await?;
        }

        if config.restore_groups {
            warn!("Group restore is not implemented; groups of {} are left untouched", pool);
        }

        Ok(summary)
    }

    async fn cleanup(&self, pool: &str, summary: &mut RestoreSummary) -> RestoreResult<()> {
        let usernames = self
            .directory
            .list_usernames(pool)
            .await
            .map_err(|e| {
                error!("[CLEANUP] Failed to get list of cognito users: {}", e);
                e
            })?;

        info!("[CLEANUP] Deleting {} users from {} userpool", usernames.len(), pool);

        for username in &usernames {
            match self.directory.delete_user(pool, username).await {
                Ok(()) => {
                    summary.deleted += 1;
                    debug!("User {} has been successfully deleted from {} userpool", username, pool);
                }
                Err(e) => {
                    summary.delete_failures += 1;
                    error!("[CLEANUP] Failed to delete user {}: {}", username, e);
                }
            }
        }

        tokio::time::sleep(self.settle_delay).await;
        info!("User pool {} has been cleaned up", pool);
        Ok(())
    }

    async fn restore_users(&self, pool: &str, users: &[BackupUser], summary: &mut RestoreSummary) -> RestoreResult<()> {
        info!("Restoring {} users into {} userpool", users.len(), pool);

        for user in users {
            let request = map_user(user);
            self.directory
                .create_user(pool, &request)
                .await
                .map_err(|e| {
                    error!("Failed to restore user {}: {}", user.display_name(), e);
                    e
                })?;

            summary.created += 1;
            debug!("User {} has been restored", user.display_name());
        }

        info!("{} users have been restored into {} userpool", summary.created, pool);
        Ok(())
    }
}
