use crate::AlarmService;
use alarm_models::AlarmDocument;

/// Failures of the fetch and submit steps shared by every command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("alarm '{name}' not found")]
    NotFound {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("describing alarm '{name}' returned no alarms")]
    EmptyResult { name: String },
    #[error("{operation} of alarm '{name}' failed")]
    TransportFailure {
        operation: &'static str,
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Models(#[from] alarm_models::Error),
}

/// Describe `name`, returning the first matching alarm.
pub async fn fetch_alarm(service: &dyn AlarmService, name: &str) -> Result<AlarmDocument, Error> {
    let described = service
        .describe_alarm(name)
        .await
        .map_err(|source| Error::NotFound {
            name: name.to_string(),
            source,
        })?;

    tracing::debug!(%name, count = described.len(), "described alarm");

    described.into_iter().next().ok_or_else(|| Error::EmptyResult {
        name: name.to_string(),
    })
}

/// Submit `doc`, creating or replacing the alarm it names.
pub async fn put_alarm(service: &dyn AlarmService, doc: &AlarmDocument) -> Result<(), Error> {
    let name = doc.name().unwrap_or_default();

    if tracing::enabled!(tracing::Level::DEBUG) {
        let rendered = serde_json::to_string_pretty(doc).unwrap_or_default();
        tracing::debug!(%name, document = %rendered, "submitting alarm");
    }

    service
        .put_alarm(doc)
        .await
        .map_err(|source| Error::TransportFailure {
            operation: "put",
            name: name.to_string(),
            source,
        })
}

pub async fn delete_alarm(service: &dyn AlarmService, name: &str) -> Result<(), Error> {
    service
        .delete_alarms(&[name.to_string()])
        .await
        .map_err(|source| Error::TransportFailure {
            operation: "delete",
            name: name.to_string(),
            source,
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::FakeAlarms;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_failures() {
        let fake = FakeAlarms::default();
        let err = fetch_alarm(&fake, "missing").await.unwrap_err();
        assert!(matches!(err, Error::EmptyResult { .. }));
        assert_eq!(err.to_string(), "describing alarm 'missing' returned no alarms");

        let fake = FakeAlarms::default().fail_describe();
        let err = fetch_alarm(&fake, "X").await.unwrap_err();
        assert_eq!(err.to_string(), "alarm 'X' not found");
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "alarm 'X' not found: DescribeAlarms failed (Throttling): Rate exceeded"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_first_match() {
        let fake = FakeAlarms::with(vec![
            json!({"AlarmName": "X", "Threshold": 1}),
            json!({"AlarmName": "X", "Threshold": 2}),
        ]);
        let doc = fetch_alarm(&fake, "X").await.unwrap();
        assert_eq!(doc.get("Threshold"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_submit_failures() {
        let fake = FakeAlarms::default().fail_put().fail_delete();
        let doc = serde_json::from_value(json!({"AlarmName": "X"})).unwrap();

        let err = put_alarm(&fake, &doc).await.unwrap_err();
        assert_eq!(err.to_string(), "put of alarm 'X' failed");

        let err = delete_alarm(&fake, "X").await.unwrap_err();
        assert_eq!(err.to_string(), "delete of alarm 'X' failed");
    }
}
