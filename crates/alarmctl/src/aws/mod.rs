use crate::{AlarmService, Config, SubscriptionService};
use alarm_models::{AlarmDocument, SubscriptionRecord};
use aws_sdk_cloudwatch::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudwatch::types::AlarmType;

mod convert;

pub use convert::{to_document, to_put_input};

/// Clients of the CloudWatch and SNS APIs, sharing one loaded SDK configuration.
#[derive(Debug, Clone)]
pub struct AwsClient {
    cloudwatch: aws_sdk_cloudwatch::Client,
    sns: aws_sdk_sns::Client,
}

impl AwsClient {
    pub async fn new(config: &Config) -> Self {
        let sdk_config = config.load_sdk_config().await;

        Self {
            cloudwatch: aws_sdk_cloudwatch::Client::new(&sdk_config),
            sns: aws_sdk_sns::Client::new(&sdk_config),
        }
    }
}

// sdk_error flattens an SDK error into its service code and message. Errors
// without a service code (dispatch, timeout, credentials) keep their full chain.
fn sdk_error<E>(operation: &str, err: E) -> anyhow::Error
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.code() {
        Some(code) => anyhow::anyhow!(
            "{operation} failed ({code}): {}",
            err.message().unwrap_or_default()
        ),
        None => anyhow::anyhow!("{operation} failed: {}", DisplayErrorContext(&err)),
    }
}

#[async_trait::async_trait]
impl AlarmService for AwsClient {
    async fn describe_alarm(&self, name: &str) -> anyhow::Result<Vec<AlarmDocument>> {
        let output = self
            .cloudwatch
            .describe_alarms()
            .alarm_names(name)
            .alarm_types(AlarmType::MetricAlarm)
            .send()
            .await
            .map_err(|err| sdk_error("DescribeAlarms", err))?;

        Ok(output.metric_alarms().iter().map(to_document).collect())
    }

    async fn put_alarm(&self, doc: &AlarmDocument) -> anyhow::Result<()> {
        to_put_input(doc)?
            .send_with(&self.cloudwatch)
            .await
            .map_err(|err| sdk_error("PutMetricAlarm", err))?;

        Ok(())
    }

    async fn delete_alarms(&self, names: &[String]) -> anyhow::Result<()> {
        self.cloudwatch
            .delete_alarms()
            .set_alarm_names(Some(names.to_vec()))
            .send()
            .await
            .map_err(|err| sdk_error("DeleteAlarms", err))?;

        Ok(())
    }

    async fn list_alarms(&self, max_items: usize) -> anyhow::Result<Vec<AlarmDocument>> {
        let mut pages = self
            .cloudwatch
            .describe_alarms()
            .alarm_types(AlarmType::MetricAlarm)
            .into_paginator()
            .send();

        let mut alarms = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| sdk_error("DescribeAlarms", err))?;
            alarms.extend(page.metric_alarms().iter().map(to_document));

            if alarms.len() >= max_items {
                break;
            }
        }
        alarms.truncate(max_items);

        tracing::debug!(count = alarms.len(), "listed metric alarms");
        Ok(alarms)
    }
}

#[async_trait::async_trait]
impl SubscriptionService for AwsClient {
    async fn list_subscriptions(
        &self,
        max_items: usize,
    ) -> anyhow::Result<Vec<SubscriptionRecord>> {
        let mut pages = self.sns.list_subscriptions().into_paginator().send();

        let mut subscriptions = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| sdk_error("ListSubscriptions", err))?;

            subscriptions.extend(page.subscriptions().iter().filter_map(|sub| {
                Some(SubscriptionRecord {
                    topic_ref: sub.topic_arn()?.to_string(),
                    endpoint: sub.endpoint()?.to_string(),
                })
            }));

            if subscriptions.len() >= max_items {
                break;
            }
        }
        subscriptions.truncate(max_items);

        tracing::debug!(count = subscriptions.len(), "listed subscriptions");
        Ok(subscriptions)
    }
}
