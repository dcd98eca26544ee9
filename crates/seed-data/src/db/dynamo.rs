//! DynamoDB-backed [`ItemStore`].

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use tracing::info;

use super::codec::Item;
use super::store::{ItemStore, PutOutcome, StoreError, WriteMode};
use crate::config::SeedConfig;

/// Condition that turns a put into an insert-only write.
const IF_ABSENT_CONDITION: &str = "attribute_not_exists(PK)";

/// [`ItemStore`] over an AWS SDK DynamoDB client.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
}

impl std::fmt::Debug for DynamoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoStore").finish_non_exhaustive()
    }
}

impl DynamoStore {
    /// Builds a client from the seed configuration.
    ///
    /// With an endpoint override (DynamoDB Local) static `local` credentials
    /// are used; otherwise the default AWS credential chain applies. Retries
    /// use the SDK's standard mode capped at `max_attempts`.
    pub async fn connect(config: &SeedConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

        if let Some(endpoint) = &config.endpoint {
            info!("Using DynamoDB endpoint {}", endpoint);
            loader = loader
                .endpoint_url(endpoint)
                .credentials_provider(Credentials::new("local", "local", None, None, "seed-data"));
        } else {
            info!("Using AWS DynamoDB in {}", config.region);
        }

        let sdk_config = loader.load().await;
        Self::from_client(Client::new(&sdk_config))
    }

    /// Wraps a pre-built client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Whether a put failed only because its condition did not hold.
fn is_conditional_check_failed<R>(err: &SdkError<PutItemError, R>) -> bool {
    err.as_service_error()
        .is_some_and(PutItemError::is_conditional_check_failed_exception)
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn put_item(
        &self,
        table: &str,
        item: Item,
        mode: WriteMode,
    ) -> Result<PutOutcome, StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(item));
        if mode == WriteMode::IfAbsent {
            request = request.condition_expression(IF_ABSENT_CONDITION);
        }

        match request.send().await {
            Ok(_) => Ok(PutOutcome::Written),
            Err(err) if mode == WriteMode::IfAbsent && is_conditional_check_failed(&err) => {
                Ok(PutOutcome::Skipped)
            }
            Err(err) => Err(StoreError::DynamoDb(Box::new(err.into()))),
        }
    }
}
