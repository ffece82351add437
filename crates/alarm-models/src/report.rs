use crate::{ActionField, AlarmDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Action lists scanned by the report, in output order.
pub const REPORT_FIELDS: [ActionField; 3] = [
    ActionField::Alarm,
    ActionField::InsufficientData,
    ActionField::Ok,
];

/// A notification subscription: a delivery endpoint bound to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub topic_ref: String,
    pub endpoint: String,
}

/// One alarm action which notifies a subscribed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub field: ActionField,
    pub alarm_name: String,
    pub topic: String,
    pub endpoint: String,
}

/// Returns true if `action` references an SNS topic rather than, for example,
/// an auto-scaling policy or an EC2 action.
pub fn is_notification_ref(action: &str) -> bool {
    let mut segments = action.split(':');

    segments.next() == Some("arn") && segments.take(2).any(|segment| segment == "sns")
}

/// The topic name of a topic reference: everything after the last `:`.
pub fn topic_name(topic_ref: &str) -> &str {
    match topic_ref.rfind(':') {
        Some(index) => &topic_ref[index + 1..],
        None => topic_ref,
    }
}

/// Join the notification actions of `alarms` against `subscriptions`,
/// yielding a row for every subscription of every referenced topic.
pub fn report_rows<'a>(
    alarms: &'a [AlarmDocument],
    subscriptions: &'a [SubscriptionRecord],
) -> impl Iterator<Item = ReportRow> + 'a {
    alarms.iter().flat_map(move |alarm| {
        let alarm_name = alarm.name().unwrap_or_default();

        REPORT_FIELDS.iter().flat_map(move |&field| {
            alarm
                .action_refs(field)
                .into_iter()
                .filter(|action| is_notification_ref(action))
                .flat_map(move |action| {
                    subscriptions
                        .iter()
                        .filter(move |sub| sub.topic_ref == action)
                        .map(move |sub| ReportRow {
                            field,
                            alarm_name: alarm_name.to_string(),
                            topic: topic_name(action).to_string(),
                            endpoint: sub.endpoint.clone(),
                        })
                })
        })
    })
}

/// Running count of report rows per action list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally(BTreeMap<ActionField, usize>);

impl Tally {
    pub fn record(&mut self, row: &ReportRow) {
        *self.0.entry(row.field).or_default() += 1;
    }

    pub fn count(&self, field: ActionField) -> usize {
        self.0.get(&field).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}
