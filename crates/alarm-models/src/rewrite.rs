use crate::{AlarmDocument, Error, Sanitize};
use std::fmt;

/// How a fetched alarm is written back.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmOperation {
    /// Update the alarm in place.
    Update,
    /// Create a second alarm from the first, leaving the original as is.
    Copy,
    /// Copy the alarm to a new name, then delete the original.
    Recreate,
}

impl fmt::Display for AlarmOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlarmOperation::Update => "update",
            AlarmOperation::Copy => "copy",
            AlarmOperation::Recreate => "recreate",
        })
    }
}

/// A validated source and destination for writing an alarm back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    operation: AlarmOperation,
    source: String,
    destination: String,
}

impl Rewrite {
    pub fn new(
        operation: AlarmOperation,
        alarm_name: String,
        new_name: Option<String>,
    ) -> Result<Self, Error> {
        let destination = match (operation, new_name) {
            (AlarmOperation::Update, None) => alarm_name.clone(),
            (AlarmOperation::Update, Some(_)) => return Err(Error::RenameOnUpdate(alarm_name)),
            (_, None) => {
                return Err(Error::MissingRequiredArg {
                    operation: operation.to_string(),
                    argument: "a new alarm name",
                })
            }
            (_, Some(new_name)) if new_name == alarm_name => {
                return Err(Error::SameName(alarm_name))
            }
            (_, Some(new_name)) => new_name,
        };

        Ok(Self {
            operation,
            source: alarm_name,
            destination,
        })
    }

    pub fn operation(&self) -> AlarmOperation {
        self.operation
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Whether the source alarm is deleted once the destination is written.
    pub fn deletes_source(&self) -> bool {
        self.operation == AlarmOperation::Recreate
    }

    /// Sanitize a described alarm and name it for its destination.
    pub fn prepare(&self, described: AlarmDocument) -> AlarmDocument {
        let mode = match self.operation {
            AlarmOperation::Update => Sanitize::KeepName,
            AlarmOperation::Copy | AlarmOperation::Recreate => Sanitize::DropName,
        };
        let mut doc = described.sanitize(mode);
        doc.set_name(&self.destination);
        doc
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rewrite_validation() {
        let update = Rewrite::new(AlarmOperation::Update, "x".into(), None).unwrap();
        assert_eq!(update.destination(), "x");
        assert!(!update.deletes_source());

        let recreate =
            Rewrite::new(AlarmOperation::Recreate, "x".into(), Some("y".into())).unwrap();
        assert_eq!((recreate.source(), recreate.destination()), ("x", "y"));
        assert!(recreate.deletes_source());

        let copy = Rewrite::new(AlarmOperation::Copy, "x".into(), Some("y".into())).unwrap();
        assert!(!copy.deletes_source());

        assert!(matches!(
            Rewrite::new(AlarmOperation::Update, "x".into(), Some("y".into())),
            Err(Error::RenameOnUpdate(_))
        ));
        assert!(matches!(
            Rewrite::new(AlarmOperation::Copy, "x".into(), None),
            Err(Error::MissingRequiredArg { .. })
        ));
        assert!(matches!(
            Rewrite::new(AlarmOperation::Recreate, "x".into(), Some("x".into())),
            Err(Error::SameName(_))
        ));
    }

    #[test]
    fn test_prepare_renames_and_strips_identity() {
        let described: AlarmDocument = serde_json::from_value(json!({
            "AlarmName": "x",
            "AlarmArn": "arn:aws:cloudwatch:eu-west-1:123456789012:alarm:x",
            "StateValue": "ALARM",
            "Threshold": 10,
        }))
        .unwrap();

        let rewrite =
            Rewrite::new(AlarmOperation::Recreate, "x".into(), Some("y".into())).unwrap();

        insta::assert_json_snapshot!(rewrite.prepare(described), @r###"
        {
          "AlarmName": "y",
          "Threshold": 10
        }
        "###);
    }
}
