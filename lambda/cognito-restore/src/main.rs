use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{error, info};

use restore_shared::{
    init_tracing, load_sdk_config, BackupFetcher, CognitoService, EnvSnapshot, KmsService,
    LogSettings, RestoreConfig, RestoreEvent, RestoreExecutor, RestoreResponse, RestoreResult,
    RestoreSummary, S3Service,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    init_tracing(LogSettings::from_env(&EnvSnapshot::from_process()))?;

    info!("Starting cognito-restore Lambda function");

    run(service_fn(function_handler)).await
}

async fn function_handler(event: LambdaEvent<Option<RestoreEvent>>) -> Result<RestoreResponse, Error> {
    let (payload, context) = event.into_parts();
    info!("Received restore request {}", context.request_id);

    // Environment is the base, the payload overrides it
    let env = EnvSnapshot::from_process();
    let config = match RestoreConfig::resolve(&env, payload.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}: {}", RestoreResponse::FAILURE_MESSAGE, e);
            return Err(e.into());
        }
    };

    match restore(&config).await {
        Ok(summary) => {
            info!("Restore of {} finished - {}", config.cognito_user_pool_id, summary);
            Ok(RestoreResponse::success(&config.cognito_user_pool_id, &summary))
        }
        Err(e) => {
            error!("{}: {}", RestoreResponse::FAILURE_MESSAGE, e);
            Err(e.into())
        }
    }
}

/// Builds fresh clients for this invocation and runs the restore.
async fn restore(config: &RestoreConfig) -> RestoreResult<RestoreSummary> {
    // Initialize AWS clients, each pinned to its own region
    let cognito_config = load_sdk_config(&config.cognito_region).await;
    let s3_config = load_sdk_config(&config.s3_bucket_region).await;

    let cognito = CognitoService::new(aws_sdk_cognitoidentityprovider::Client::new(&cognito_config));
    let s3 = S3Service::new(aws_sdk_s3::Client::new(&s3_config));

    // Decrypt only when a KMS key is configured
    let mut backups = BackupFetcher::new(Arc::new(s3));
    if let Some(key_id) = &config.kms_key_id {
        let kms_config = load_sdk_config(&config.kms_region).await;
        let kms = KmsService::new(aws_sdk_kms::Client::new(&kms_config));
        backups = backups.with_decryption(Arc::new(kms), key_id.clone());
        info!("Backup data will be decrypted with KMS key {}", key_id);
    }

    RestoreExecutor::new(Arc::new(cognito), backups)
        .execute(config)
        .await
}

#[cfg(test)]
mod tests {
    use restore_shared::{RestoreEvent, RestoreResponse, RestoreSummary};

    #[test]
    fn test_null_payload_means_env_only() {
        let payload: Option<RestoreEvent> = serde_json::from_str("null").unwrap();
        assert!(payload.is_none());
    }

    #[test]
    fn test_response_serializes_answer_field() {
        let summary = RestoreSummary {
            deleted: 0,
            delete_failures: 0,
            created: 1,
        };
        let response = RestoreResponse::success("P", &summary);
        let json = serde_json::to_value(&response).unwrap();

        let answer = json["answer"].as_str().unwrap();
        assert!(answer.contains("P"));
        assert!(answer.contains("created: 1"));

        assert_eq!(RestoreResponse::FAILURE_MESSAGE, "Failed to restore Cognito user pool");
    }
}
