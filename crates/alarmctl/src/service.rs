use alarm_models::{AlarmDocument, SubscriptionRecord};

/// Operations on CloudWatch metric alarms.
///
/// Documents use the field names of the DescribeAlarms response. Errors are
/// opaque here; the pipeline decides how each failure is reported.
#[async_trait::async_trait]
pub trait AlarmService: Send + Sync {
    /// Describe alarms matching an exact name. The result is empty if none matched.
    async fn describe_alarm(&self, name: &str) -> anyhow::Result<Vec<AlarmDocument>>;

    /// Create or fully replace the alarm named by the document's `AlarmName`.
    async fn put_alarm(&self, doc: &AlarmDocument) -> anyhow::Result<()>;

    /// Delete alarms by name.
    async fn delete_alarms(&self, names: &[String]) -> anyhow::Result<()>;

    /// List metric alarms, following pagination until `max_items` are gathered.
    async fn list_alarms(&self, max_items: usize) -> anyhow::Result<Vec<AlarmDocument>>;
}

/// Listing of notification subscriptions.
#[async_trait::async_trait]
pub trait SubscriptionService: Send + Sync {
    /// List subscriptions, following pagination until `max_items` are gathered.
    async fn list_subscriptions(&self, max_items: usize)
        -> anyhow::Result<Vec<SubscriptionRecord>>;
}
