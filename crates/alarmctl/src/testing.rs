//! In-memory fakes of the AWS services, recording every mutating call.

use crate::{AlarmService, SubscriptionService};
use alarm_models::{AlarmDocument, SubscriptionRecord};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct FakeAlarms {
    alarms: Vec<AlarmDocument>,
    fail_describe: bool,
    fail_put: bool,
    fail_delete: bool,
    puts: Mutex<Vec<AlarmDocument>>,
    deletes: Mutex<Vec<Vec<String>>>,
}

impl FakeAlarms {
    pub fn with(alarms: Vec<serde_json::Value>) -> Self {
        Self {
            alarms: alarms
                .into_iter()
                .map(|alarm| serde_json::from_value(alarm).unwrap())
                .collect(),
            ..Default::default()
        }
    }

    pub fn fail_describe(mut self) -> Self {
        self.fail_describe = true;
        self
    }

    pub fn fail_put(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn fail_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn puts(&self) -> Vec<AlarmDocument> {
        self.puts.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<Vec<String>> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AlarmService for FakeAlarms {
    async fn describe_alarm(&self, name: &str) -> anyhow::Result<Vec<AlarmDocument>> {
        if self.fail_describe {
            anyhow::bail!("DescribeAlarms failed (Throttling): Rate exceeded");
        }
        Ok(self
            .alarms
            .iter()
            .filter(|alarm| alarm.name() == Some(name))
            .cloned()
            .collect())
    }

    async fn put_alarm(&self, doc: &AlarmDocument) -> anyhow::Result<()> {
        if self.fail_put {
            anyhow::bail!("PutMetricAlarm failed (LimitExceeded): too many alarms");
        }
        self.puts.lock().unwrap().push(doc.clone());
        Ok(())
    }

    async fn delete_alarms(&self, names: &[String]) -> anyhow::Result<()> {
        if self.fail_delete {
            anyhow::bail!("DeleteAlarms failed (ResourceNotFound): no such alarm");
        }
        self.deletes.lock().unwrap().push(names.to_vec());
        Ok(())
    }

    async fn list_alarms(&self, max_items: usize) -> anyhow::Result<Vec<AlarmDocument>> {
        Ok(self.alarms.iter().take(max_items).cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct FakeSubscriptions(pub Vec<SubscriptionRecord>);

impl FakeSubscriptions {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(topic_ref, endpoint)| SubscriptionRecord {
                    topic_ref: topic_ref.to_string(),
                    endpoint: endpoint.to_string(),
                })
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl SubscriptionService for FakeSubscriptions {
    async fn list_subscriptions(
        &self,
        max_items: usize,
    ) -> anyhow::Result<Vec<SubscriptionRecord>> {
        Ok(self.0.iter().take(max_items).cloned().collect())
    }
}
