use crate::{ActionField, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ALARM_NAME: &str = "AlarmName";
pub const ALARM_ARN: &str = "AlarmArn";

/// Fields which are assigned by CloudWatch or reflect the alarm's live state.
/// None of them are accepted when an alarm is created or updated.
pub const SERVER_FIELDS: &[&str] = &[
    ALARM_ARN,
    "AlarmConfigurationUpdatedTimestamp",
    "StateValue",
    "StateReason",
    "StateReasonData",
    "StateUpdatedTimestamp",
    "StateTransitionedTimestamp",
    "EvaluationState",
];

/// Whether sanitizing keeps the alarm's name. Copy and recreate flows drop it
/// so that a new name can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitize {
    KeepName,
    DropName,
}

/// The full configuration of one metric alarm, keyed by the field names used
/// in `describe-alarms` output (`AlarmName`, `OKActions`, `Threshold`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmDocument(Map<String, Value>);

impl AlarmDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(ALARM_NAME).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Strip server-assigned identity and state so the document can be used
    /// as a PutMetricAlarm payload. Absent fields are ignored.
    pub fn sanitize(mut self, mode: Sanitize) -> Self {
        for field in SERVER_FIELDS {
            self.0.remove(*field);
        }
        if mode == Sanitize::DropName {
            self.0.remove(ALARM_NAME);
        }
        self
    }

    pub fn set_name(&mut self, name: &str) {
        self.0
            .insert(ALARM_NAME.to_string(), Value::String(name.to_string()));
    }

    /// Returns the action references of `field`. A missing field is an empty
    /// list, anything other than an array of strings is an error.
    pub fn action_list(&self, field: ActionField) -> Result<Vec<String>, Error> {
        let invalid = || Error::InvalidActionList {
            alarm: self.name().unwrap_or_default().to_string(),
            field,
        };

        match self.0.get(field.as_str()) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                .collect(),
            Some(_) => Err(invalid()),
        }
    }

    pub fn set_action_list(&mut self, field: ActionField, actions: Vec<String>) {
        self.0.insert(
            field.as_str().to_string(),
            Value::Array(actions.into_iter().map(Value::String).collect()),
        );
    }

    /// Action references of `field` which are strings. Used when scanning
    /// alarms for reporting, where malformed entries are skipped.
    pub fn action_refs(&self, field: ActionField) -> Vec<&str> {
        match self.0.get(field.as_str()) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for AlarmDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
